use std::sync::Arc;

use api::QuestionsApi;
use quiz_core::model::{FieldId, Question, QuestionDraft, QuestionKind};

use crate::error::QuestionServiceError;

/// Question listing and authoring for admins.
#[derive(Clone)]
pub struct QuestionService {
    questions: Arc<dyn QuestionsApi>,
}

impl QuestionService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionsApi>) -> Self {
        Self { questions }
    }

    /// The ordered question set for a field.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Api` on backend failure.
    pub async fn list(&self, field: &FieldId) -> Result<Vec<Question>, QuestionServiceError> {
        Ok(self.questions.questions_for_field(field).await?)
    }

    /// Validates authoring input and creates the question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionServiceError::Question` for rejected input and
    /// `QuestionServiceError::Api` on backend failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        field: &FieldId,
        kind: QuestionKind,
        text: &str,
        options: Vec<String>,
        correct_answer: &str,
        solution: Option<String>,
        time_allocated: Option<u32>,
    ) -> Result<Question, QuestionServiceError> {
        let draft = QuestionDraft::new(
            kind,
            text,
            options,
            correct_answer,
            solution.filter(|text| !text.trim().is_empty()),
            time_allocated,
        )?;
        Ok(self.questions.create_question(field, &draft).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryBackend;
    use quiz_core::model::QuestionError;

    #[tokio::test]
    async fn create_rejects_bad_drafts_locally() {
        let backend = InMemoryBackend::new();
        let service = QuestionService::new(Arc::new(backend.clone()));
        let field = FieldId::new("f1").unwrap();

        let err = service
            .create(
                &field,
                QuestionKind::Mcq,
                "2+2?",
                vec!["4".into()],
                "4",
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionServiceError::Question(QuestionError::NotEnoughOptions { got: 1 })
        ));
        assert!(backend.questions_for_field(&field).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_blanks_out_empty_solution() {
        let backend = InMemoryBackend::new();
        let service = QuestionService::new(Arc::new(backend));
        let field = FieldId::new("f1").unwrap();

        let question = service
            .create(
                &field,
                QuestionKind::Descriptive,
                "Explain inertia.",
                Vec::new(),
                "",
                Some("   ".into()),
                Some(120),
            )
            .await
            .unwrap();
        assert_eq!(question.solution(), None);
        assert_eq!(question.time_allocated(), Some(120));
    }
}
