use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{Field, FieldDraft, FieldId};

use crate::backend::FieldsApi;
use crate::client::ApiError;
use crate::http::HttpBackend;

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct FieldDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "for", default)]
    audience: String,
    #[serde(rename = "defaultTimePerQuestion", default)]
    default_time_per_question: Option<u32>,
}

impl TryFrom<FieldDto> for Field {
    type Error = ApiError;

    fn try_from(dto: FieldDto) -> Result<Self, Self::Error> {
        Field::new(
            FieldId::new(dto.id).map_err(ApiError::decode)?,
            dto.name,
            dto.description,
            dto.audience,
            dto.default_time_per_question
                .unwrap_or(Field::DEFAULT_TIME_PER_QUESTION),
        )
        .map_err(ApiError::decode)
    }
}

#[derive(Debug, Serialize)]
struct FieldBody<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(rename = "for")]
    audience: &'a str,
    #[serde(
        rename = "defaultTimePerQuestion",
        skip_serializing_if = "Option::is_none"
    )]
    default_time_per_question: Option<u32>,
}

impl<'a> From<&'a FieldDraft> for FieldBody<'a> {
    fn from(draft: &'a FieldDraft) -> Self {
        Self {
            name: draft.name(),
            description: draft.description(),
            audience: draft.audience(),
            default_time_per_question: draft.default_time_per_question(),
        }
    }
}

fn fields_from(dtos: Vec<FieldDto>) -> Result<Vec<Field>, ApiError> {
    dtos.into_iter().map(Field::try_from).collect()
}

//
// ─── API ───────────────────────────────────────────────────────────────────────
//

#[async_trait]
impl FieldsApi for HttpBackend {
    async fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
        fields_from(self.client().get_json("/fields").await?)
    }

    async fn list_fields_admin(&self) -> Result<Vec<Field>, ApiError> {
        fields_from(self.client().get_json("/admin/fields").await?)
    }

    async fn create_field(&self, draft: &FieldDraft) -> Result<Field, ApiError> {
        let dto: FieldDto = self
            .client()
            .post_json("/admin/fields", &FieldBody::from(draft))
            .await?;
        dto.try_into()
    }

    async fn update_field(&self, id: &FieldId, draft: &FieldDraft) -> Result<Field, ApiError> {
        let dto: FieldDto = self
            .client()
            .put_json(&format!("/admin/fields/{id}"), &FieldBody::from(draft))
            .await?;
        dto.try_into()
    }

    async fn delete_field(&self, id: &FieldId) -> Result<(), ApiError> {
        self.client().delete(&format!("/admin/fields/{id}")).await
    }
}
