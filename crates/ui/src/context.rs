use std::sync::Arc;

use services::{AuthService, FieldService, PaymentService, QuestionService, QuizFlowService};

/// Services the composition root hands to the views.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn fields(&self) -> Arc<FieldService>;
    fn questions(&self) -> Arc<QuestionService>;
    fn payments(&self) -> Arc<PaymentService>;
    fn quiz_flow(&self) -> Arc<QuizFlowService>;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    fields: Arc<FieldService>,
    questions: Arc<QuestionService>,
    payments: Arc<PaymentService>,
    quiz_flow: Arc<QuizFlowService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            fields: app.fields(),
            questions: app.questions(),
            payments: app.payments(),
            quiz_flow: app.quiz_flow(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn fields(&self) -> Arc<FieldService> {
        Arc::clone(&self.fields)
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn payments(&self) -> Arc<PaymentService> {
        Arc::clone(&self.payments)
    }

    #[must_use]
    pub fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
///
/// This context is provided by the application composition root
/// (e.g. `crates/app`).
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
