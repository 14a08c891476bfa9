mod answer_sheet;
mod field;
mod ids;
mod payment;
mod question;
mod report;
mod session_state;
mod user;

pub use ids::{FieldId, OrderId, ParseIdError, QuestionId};

pub use answer_sheet::{AnswerEntry, AnswerSheet, AnswerSubmission};
pub use field::{Field, FieldDraft, FieldError};
pub use payment::{
    OrderQr, PaymentAction, PaymentOrder, PaymentStatus, PendingPayment, Screenshot,
};
pub use question::{Question, QuestionDraft, QuestionError, QuestionKind};
pub use report::{GradedAnswer, ReportError, ScoredReport};
pub use session_state::SessionState;
pub use user::{Registration, User, UserRole};
