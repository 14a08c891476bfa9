//! Shared error types for the services crate.

use thiserror::Error;

use api::{ApiError, TokenStoreError};
use quiz_core::model::{FieldError, FieldId, QuestionError, QuestionId};

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("full name is required")]
    EmptyName,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("password is required")]
    EmptyPassword,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("enter exactly 10 digits for the WhatsApp number")]
    InvalidMobile,
    #[error("enter the OTP")]
    EmptyOtp,
    #[error(transparent)]
    Token(#[from] TokenStoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `FieldService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FieldServiceError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `PaymentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaymentError {
    #[error("enter the bank UTR reference")]
    EmptyUtr,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the quiz session flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("field {0} does not exist")]
    UnknownField(FieldId),
    #[error("this quiz has no questions")]
    NoQuestions,
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("enter your name to start the quiz")]
    EmptyName,
    #[error("the quiz has already started")]
    AlreadyStarted,
    #[error("the quiz has not started yet")]
    NotStarted,
    #[error("answers can no longer be changed")]
    AnswersLocked,
    #[error("answer at least one question before submitting")]
    NothingAnswered,
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("this attempt was already submitted")]
    AlreadySubmitted,
    #[error("nothing has been submitted yet")]
    NotSubmitted,
    #[error("submission can only be retried after a failure")]
    NotRetryable,
    #[error("the server did not accept the submission")]
    NotAcknowledged,
    #[error(transparent)]
    Api(#[from] ApiError),
}
