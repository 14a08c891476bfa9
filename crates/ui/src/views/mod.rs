mod admin_add_question;
mod admin_fields;
mod admin_payments;
mod dashboard;
mod join_quiz;
mod landing;
mod login;
mod quiz;
mod register;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use admin_add_question::AdminAddQuestionView;
pub use admin_fields::AdminFieldsView;
pub use admin_payments::AdminPaymentsView;
pub use dashboard::DashboardView;
pub use join_quiz::JoinQuizView;
pub use landing::LandingView;
pub use login::LoginView;
pub use quiz::QuizView;
pub use register::RegisterView;
pub use state::{ViewError, ViewState, view_state_from_resource};
