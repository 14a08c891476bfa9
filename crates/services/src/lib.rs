#![forbid(unsafe_code)]

pub mod auth_service;
pub mod error;
pub mod field_service;
pub mod payment_service;
pub mod question_service;
pub mod quiz;

pub use quiz_core::Clock;

pub use auth_service::{AuthService, OTP_RESEND_WINDOW_SECS, RegistrationForm};
pub use error::{
    AuthError, FieldServiceError, PaymentError, QuestionServiceError, QuizError,
};
pub use field_service::FieldService;
pub use payment_service::PaymentService;
pub use question_service::QuestionService;
pub use quiz::{
    QuizFlowService, QuizProgress, QuizSession, SessionTimer, SubmitOutcome, TimerState,
    TimerTick,
};
