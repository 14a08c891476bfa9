use thiserror::Error;

use crate::model::{FieldError, QuestionError, ReportError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
