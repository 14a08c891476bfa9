use std::sync::Arc;

use api::FieldsApi;
use quiz_core::model::{Field, FieldDraft, FieldId};

use crate::error::FieldServiceError;

/// Field listing for learners and CRUD for admins.
#[derive(Clone)]
pub struct FieldService {
    fields: Arc<dyn FieldsApi>,
}

impl FieldService {
    #[must_use]
    pub fn new(fields: Arc<dyn FieldsApi>) -> Self {
        Self { fields }
    }

    /// Public listing, for the learner dashboard.
    ///
    /// # Errors
    ///
    /// Returns `FieldServiceError::Api` on backend failure.
    pub async fn list(&self) -> Result<Vec<Field>, FieldServiceError> {
        Ok(self.fields.list_fields().await?)
    }

    /// Admin listing.
    ///
    /// # Errors
    ///
    /// Returns `FieldServiceError::Api` on backend failure.
    pub async fn list_admin(&self) -> Result<Vec<Field>, FieldServiceError> {
        Ok(self.fields.list_fields_admin().await?)
    }

    /// Validates and creates a field.
    ///
    /// # Errors
    ///
    /// Returns `FieldServiceError::Field` for rejected input and
    /// `FieldServiceError::Api` on backend failure.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        audience: &str,
        default_time_per_question: Option<u32>,
    ) -> Result<Field, FieldServiceError> {
        let draft = FieldDraft::new(name, description, audience, default_time_per_question)?;
        Ok(self.fields.create_field(&draft).await?)
    }

    /// Validates and updates a field.
    ///
    /// # Errors
    ///
    /// Returns `FieldServiceError::Field` for rejected input and
    /// `FieldServiceError::Api` on backend failure.
    pub async fn update(
        &self,
        id: &FieldId,
        name: &str,
        description: &str,
        audience: &str,
        default_time_per_question: Option<u32>,
    ) -> Result<Field, FieldServiceError> {
        let draft = FieldDraft::new(name, description, audience, default_time_per_question)?;
        Ok(self.fields.update_field(id, &draft).await?)
    }

    /// Deletes a field and everything under it.
    ///
    /// # Errors
    ///
    /// Returns `FieldServiceError::Api` on backend failure.
    pub async fn delete(&self, id: &FieldId) -> Result<(), FieldServiceError> {
        Ok(self.fields.delete_field(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryBackend;

    #[tokio::test]
    async fn create_validates_before_calling_the_backend() {
        let backend = InMemoryBackend::new();
        let service = FieldService::new(Arc::new(backend.clone()));

        let err = service.create("  ", "", "", None).await.unwrap_err();
        assert!(matches!(err, FieldServiceError::Field(_)));
        assert!(backend.list_fields().await.unwrap().is_empty());

        let field = service.create("Physics", "", "JEE", Some(45)).await.unwrap();
        assert_eq!(field.name(), "Physics");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
