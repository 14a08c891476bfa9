use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerSubmission, FieldId, GradedAnswer, Question, QuestionDraft, QuestionId, QuestionKind,
    ScoredReport,
};

use crate::backend::QuestionsApi;
use crate::client::ApiError;
use crate::http::HttpBackend;

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct OptionDto {
    pub(crate) text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    text: String,
    #[serde(default)]
    options: Vec<OptionDto>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(rename = "timeAllocated", default)]
    time_allocated: Option<u32>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

impl QuestionDto {
    fn into_question(self, field: &FieldId) -> Result<Question, ApiError> {
        Question::new(
            QuestionId::new(self.id).map_err(ApiError::decode)?,
            field.clone(),
            self.kind,
            self.text,
            self.options.into_iter().map(|option| option.text).collect(),
            self.solution,
            self.time_allocated,
            self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
        .map_err(ApiError::decode)
    }
}

/// The question list envelope; an absent list means "no questions".
#[derive(Debug, Deserialize)]
struct QuestionSetDto {
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateQuestionBody<'a> {
    #[serde(rename = "type")]
    kind: QuestionKind,
    text: &'a str,
    field_id: &'a FieldId,
    options: Vec<OptionDto>,
    correct_answer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_allocated: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SubmitAckDto {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct ProgressEnvelopeDto {
    progress: ProgressDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressDto {
    #[serde(default)]
    total_answered: u32,
    #[serde(default)]
    total_correct: u32,
    #[serde(default)]
    questions_answered: Vec<GradedDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradedDto {
    question: QuestionSnapshotDto,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    is_correct: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// The question as it existed at grading time, not the live question.
#[derive(Debug, Deserialize)]
struct QuestionSnapshotDto {
    #[serde(rename = "_id")]
    id: String,
    text: String,
    #[serde(rename = "correctAnswer", default)]
    correct_answer: Option<String>,
}

impl TryFrom<GradedDto> for GradedAnswer {
    type Error = ApiError;

    fn try_from(dto: GradedDto) -> Result<Self, Self::Error> {
        Ok(GradedAnswer {
            question_id: QuestionId::new(dto.question.id).map_err(ApiError::decode)?,
            question_text: dto.question.text,
            submitted_answer: dto.answer,
            is_correct: dto.is_correct,
            correct_answer: dto.question.correct_answer,
            graded_at: dto.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }
}

impl TryFrom<ProgressDto> for ScoredReport {
    type Error = ApiError;

    fn try_from(dto: ProgressDto) -> Result<Self, Self::Error> {
        let entries = dto
            .questions_answered
            .into_iter()
            .map(GradedAnswer::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ScoredReport::from_parts(dto.total_answered, dto.total_correct, entries)
            .map_err(ApiError::decode)
    }
}

//
// ─── API ───────────────────────────────────────────────────────────────────────
//

#[async_trait]
impl QuestionsApi for HttpBackend {
    async fn questions_for_field(&self, field: &FieldId) -> Result<Vec<Question>, ApiError> {
        let set: QuestionSetDto = self
            .client()
            .get_json(&format!("/admin/questions/fields/que/{field}"))
            .await?;
        set.questions
            .into_iter()
            .map(|dto| dto.into_question(field))
            .collect()
    }

    async fn create_question(
        &self,
        field: &FieldId,
        draft: &QuestionDraft,
    ) -> Result<Question, ApiError> {
        let body = CreateQuestionBody {
            kind: draft.kind(),
            text: draft.text(),
            field_id: field,
            options: draft
                .options()
                .iter()
                .map(|text| OptionDto { text: text.clone() })
                .collect(),
            correct_answer: draft.correct_answer(),
            solution: draft.solution(),
            time_allocated: draft.time_allocated(),
        };
        let dto: QuestionDto = self
            .client()
            .post_json(
                &format!("/admin/questions/fields/{field}/questions"),
                &body,
            )
            .await?;
        dto.into_question(field)
    }

    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<bool, ApiError> {
        let ack: SubmitAckDto = self
            .client()
            .post_json(
                &format!(
                    "/admin/questions/fields/submit-answer/{}",
                    submission.field_id
                ),
                submission,
            )
            .await?;
        Ok(ack.success)
    }

    async fn progress_report(&self, field: &FieldId) -> Result<ScoredReport, ApiError> {
        let envelope: ProgressEnvelopeDto = self
            .client()
            .get_json(&format!("/admin/questions/fields/progress/{field}"))
            .await?;
        envelope.progress.try_into()
    }
}
