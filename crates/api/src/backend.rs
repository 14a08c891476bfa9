use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use reqwest::StatusCode;

use quiz_core::model::{
    AnswerSubmission, Field, FieldDraft, FieldId, OrderId, OrderQr, PaymentAction, PaymentOrder,
    PaymentStatus, PendingPayment, Question, QuestionDraft, QuestionId, Registration,
    ScoredReport, Screenshot, User,
};

use crate::client::ApiError;

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Field listing and admin CRUD.
#[async_trait]
pub trait FieldsApi: Send + Sync {
    /// Public field listing for learners.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn list_fields(&self) -> Result<Vec<Field>, ApiError>;

    /// Admin field listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn list_fields_admin(&self) -> Result<Vec<Field>, ApiError>;

    /// Creates a field and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn create_field(&self, draft: &FieldDraft) -> Result<Field, ApiError>;

    /// Updates a field and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 when the field is unknown.
    async fn update_field(&self, id: &FieldId, draft: &FieldDraft) -> Result<Field, ApiError>;

    /// Deletes a field.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn delete_field(&self, id: &FieldId) -> Result<(), ApiError>;
}

/// Question retrieval, authoring, submission, and grading.
#[async_trait]
pub trait QuestionsApi: Send + Sync {
    /// The ordered question set for a field. An absent list in the response
    /// means "no questions", not an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn questions_for_field(&self, field: &FieldId) -> Result<Vec<Question>, ApiError>;

    /// Creates a question under a field and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn create_question(
        &self,
        field: &FieldId,
        draft: &QuestionDraft,
    ) -> Result<Question, ApiError>;

    /// Sends a completed attempt for grading. Returns the backend's success
    /// acknowledgement flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<bool, ApiError>;

    /// Fetches the scored report for the caller's latest attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure, including 404
    /// when nothing has been graded yet.
    async fn progress_report(&self, field: &FieldId) -> Result<ScoredReport, ApiError>;
}

/// Login, registration, and OTP verification.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for rejected credentials.
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// Creates an account after OTP verification.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// Emails a one-time code to the address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn send_otp(&self, email: &str) -> Result<(), ApiError>;

    /// Confirms the one-time code.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an invalid or expired code.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError>;

    /// The profile behind the current bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 401 when unauthenticated.
    async fn me(&self) -> Result<User, ApiError>;
}

/// Payment orders, proof upload, and admin review.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Opens a payment order for joining a field's quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn create_order(&self, field: &FieldId) -> Result<PaymentOrder, ApiError>;

    /// UPI QR details for an open order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn order_qr(&self, order: &OrderId) -> Result<OrderQr, ApiError>;

    /// Submits the bank UTR reference (and optional screenshot) for an
    /// order. Returns the backend's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn submit_utr(
        &self,
        order: &OrderId,
        utr: &str,
        screenshot: Option<Screenshot>,
    ) -> Result<String, ApiError>;

    /// Payments awaiting admin review.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn pending_payments(&self) -> Result<Vec<PendingPayment>, ApiError>;

    /// Approves or rejects a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or backend failure.
    async fn review_payment(&self, payment: &str, action: PaymentAction) -> Result<(), ApiError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

fn lock_err() -> ApiError {
    ApiError::Decode("backend state lock poisoned".into())
}

fn status_err(status: StatusCode, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

#[derive(Debug, Default)]
struct BackendState {
    fields: Vec<Field>,
    questions: HashMap<FieldId, Vec<Question>>,
    submissions: Vec<AnswerSubmission>,
    reports: HashMap<FieldId, ScoredReport>,
    users: Vec<(Registration, User)>,
    otps: HashMap<String, String>,
    current_user: Option<User>,
    orders: HashMap<OrderId, PaymentOrder>,
    payments: Vec<PendingPayment>,
    fail_submissions: bool,
    fail_reports: bool,
    acknowledge_submissions: bool,
    next_id: u64,
}

/// Deterministic stand-in for the remote backend, used by tests and view
/// smoke runs. Records every submission it accepts so assertions can check
/// exactly how many requests were dispatched and what they carried.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryBackend {
    /// The one-time code `send_otp` always issues.
    pub const OTP: &'static str = "424242";

    #[must_use]
    pub fn new() -> Self {
        let backend = Self::default();
        if let Ok(mut state) = backend.state.lock() {
            state.acknowledge_submissions = true;
        }
        backend
    }

    fn locked(&self) -> Result<MutexGuard<'_, BackendState>, ApiError> {
        self.state.lock().map_err(|_| lock_err())
    }

    fn mint_id(state: &mut BackendState, prefix: &str) -> String {
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }

    /// Inserts a field as if an admin had created it out of band.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn seed_field(&self, field: Field) {
        let mut state = self.state.lock().expect("backend state lock");
        state.fields.push(field);
    }

    /// Replaces the question set served for a field.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn seed_questions(&self, field: &FieldId, questions: Vec<Question>) {
        let mut state = self.state.lock().expect("backend state lock");
        state.questions.insert(field.clone(), questions);
    }

    /// Sets the scored report the progress endpoint will return.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn set_report(&self, field: &FieldId, report: ScoredReport) {
        let mut state = self.state.lock().expect("backend state lock");
        state.reports.insert(field.clone(), report);
    }

    /// Every submission accepted so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    #[must_use]
    pub fn submissions(&self) -> Vec<AnswerSubmission> {
        self.state
            .lock()
            .expect("backend state lock")
            .submissions
            .clone()
    }

    /// Makes submission requests fail with a 500 until turned off again.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn fail_submissions(&self, fail: bool) {
        self.state.lock().expect("backend state lock").fail_submissions = fail;
    }

    /// Makes report requests fail with a 500 until turned off again.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn fail_reports(&self, fail: bool) {
        self.state.lock().expect("backend state lock").fail_reports = fail;
    }

    /// When false, submissions are stored but acknowledged with
    /// `success: false`.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned (test helper).
    pub fn acknowledge_submissions(&self, acknowledge: bool) {
        self.state
            .lock()
            .expect("backend state lock")
            .acknowledge_submissions = acknowledge;
    }
}

#[async_trait]
impl FieldsApi for InMemoryBackend {
    async fn list_fields(&self) -> Result<Vec<Field>, ApiError> {
        Ok(self.locked()?.fields.clone())
    }

    async fn list_fields_admin(&self) -> Result<Vec<Field>, ApiError> {
        Ok(self.locked()?.fields.clone())
    }

    async fn create_field(&self, draft: &FieldDraft) -> Result<Field, ApiError> {
        let mut state = self.locked()?;
        let id = Self::mint_id(&mut state, "field");
        let field = Field::new(
            FieldId::new(id).map_err(ApiError::decode)?,
            draft.name(),
            draft.description(),
            draft.audience(),
            draft
                .default_time_per_question()
                .unwrap_or(Field::DEFAULT_TIME_PER_QUESTION),
        )
        .map_err(ApiError::decode)?;
        state.fields.insert(0, field.clone());
        Ok(field)
    }

    async fn update_field(&self, id: &FieldId, draft: &FieldDraft) -> Result<Field, ApiError> {
        let mut state = self.locked()?;
        let slot = state
            .fields
            .iter_mut()
            .find(|field| field.id() == id)
            .ok_or_else(|| status_err(StatusCode::NOT_FOUND, "field not found"))?;
        let updated = Field::new(
            id.clone(),
            draft.name(),
            draft.description(),
            draft.audience(),
            draft
                .default_time_per_question()
                .unwrap_or(slot.default_time_per_question()),
        )
        .map_err(ApiError::decode)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_field(&self, id: &FieldId) -> Result<(), ApiError> {
        let mut state = self.locked()?;
        state.fields.retain(|field| field.id() != id);
        state.questions.remove(id);
        Ok(())
    }
}

#[async_trait]
impl QuestionsApi for InMemoryBackend {
    async fn questions_for_field(&self, field: &FieldId) -> Result<Vec<Question>, ApiError> {
        Ok(self
            .locked()?
            .questions
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_question(
        &self,
        field: &FieldId,
        draft: &QuestionDraft,
    ) -> Result<Question, ApiError> {
        let mut state = self.locked()?;
        let id = Self::mint_id(&mut state, "question");
        let question = Question::new(
            QuestionId::new(id).map_err(ApiError::decode)?,
            field.clone(),
            draft.kind(),
            draft.text(),
            draft.options().to_vec(),
            draft.solution().map(str::to_string),
            draft.time_allocated(),
            chrono::Utc::now(),
        )
        .map_err(ApiError::decode)?;
        state
            .questions
            .entry(field.clone())
            .or_default()
            .push(question.clone());
        Ok(question)
    }

    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<bool, ApiError> {
        let mut state = self.locked()?;
        if state.fail_submissions {
            return Err(status_err(
                StatusCode::INTERNAL_SERVER_ERROR,
                "submission rejected",
            ));
        }
        state.submissions.push(submission.clone());
        Ok(state.acknowledge_submissions)
    }

    async fn progress_report(&self, field: &FieldId) -> Result<ScoredReport, ApiError> {
        let state = self.locked()?;
        if state.fail_reports {
            return Err(status_err(
                StatusCode::INTERNAL_SERVER_ERROR,
                "progress unavailable",
            ));
        }
        state
            .reports
            .get(field)
            .cloned()
            .ok_or_else(|| status_err(StatusCode::NOT_FOUND, "no progress recorded"))
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let mut state = self.locked()?;
        let user = state
            .users
            .iter()
            .find(|(registration, _)| {
                registration.email == email && registration.password == password
            })
            .map(|(_, user)| user.clone())
            .ok_or_else(|| status_err(StatusCode::UNAUTHORIZED, "invalid credentials"))?;
        state.current_user = Some(user);
        let token = Self::mint_id(&mut state, "token");
        Ok(token)
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let mut state = self.locked()?;
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.email == registration.email)
        {
            return Err(status_err(StatusCode::CONFLICT, "email already registered"));
        }
        let id = Self::mint_id(&mut state, "user");
        let user = User {
            id,
            name: registration.name.clone(),
            email: registration.email.clone(),
            mobile: registration.mobile.clone(),
            role: registration.role,
        };
        state.users.push((registration.clone(), user));
        Ok(())
    }

    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        let mut state = self.locked()?;
        state.otps.insert(email.to_string(), Self::OTP.to_string());
        Ok(())
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let state = self.locked()?;
        match state.otps.get(email) {
            Some(expected) if expected == otp => Ok(()),
            _ => Err(status_err(StatusCode::BAD_REQUEST, "invalid OTP")),
        }
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.locked()?
            .current_user
            .clone()
            .ok_or_else(|| status_err(StatusCode::UNAUTHORIZED, "not logged in"))
    }
}

#[async_trait]
impl PaymentsApi for InMemoryBackend {
    async fn create_order(&self, _field: &FieldId) -> Result<PaymentOrder, ApiError> {
        let mut state = self.locked()?;
        let id = Self::mint_id(&mut state, "order");
        let order = PaymentOrder {
            order_id: OrderId::new(id).map_err(ApiError::decode)?,
            amount: 99,
        };
        state.orders.insert(order.order_id.clone(), order.clone());
        Ok(order)
    }

    async fn order_qr(&self, order: &OrderId) -> Result<OrderQr, ApiError> {
        let state = self.locked()?;
        if !state.orders.contains_key(order) {
            return Err(status_err(StatusCode::NOT_FOUND, "order not found"));
        }
        Ok(OrderQr {
            qr_data_url: format!("data:image/png;base64,{order}"),
            upi_uri: format!("upi://pay?tr={order}"),
        })
    }

    async fn submit_utr(
        &self,
        order: &OrderId,
        utr: &str,
        _screenshot: Option<Screenshot>,
    ) -> Result<String, ApiError> {
        let mut state = self.locked()?;
        let amount = state
            .orders
            .get(order)
            .map(|open| open.amount)
            .ok_or_else(|| status_err(StatusCode::NOT_FOUND, "order not found"))?;
        let id = Self::mint_id(&mut state, "payment");
        state.payments.push(PendingPayment {
            id,
            order_id: order.clone(),
            amount,
            utr: Some(utr.to_string()),
            status: PaymentStatus::Pending,
        });
        Ok("UTR received; await admin verification".to_string())
    }

    async fn pending_payments(&self) -> Result<Vec<PendingPayment>, ApiError> {
        Ok(self
            .locked()?
            .payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Pending)
            .cloned()
            .collect())
    }

    async fn review_payment(&self, payment: &str, action: PaymentAction) -> Result<(), ApiError> {
        let mut state = self.locked()?;
        let slot = state
            .payments
            .iter_mut()
            .find(|pending| pending.id == payment)
            .ok_or_else(|| status_err(StatusCode::NOT_FOUND, "payment not found"))?;
        slot.status = match action {
            PaymentAction::Approve => PaymentStatus::Verified,
            PaymentAction::Reject => PaymentStatus::Rejected,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionKind, UserRole};

    fn student_registration(email: &str) -> Registration {
        Registration {
            name: "Priya".into(),
            email: email.into(),
            mobile: "9876543210".into(),
            password: "secret123".into(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn field_crud_roundtrip() {
        let backend = InMemoryBackend::new();
        let draft = FieldDraft::new("Physics", "Mechanics", "JEE", Some(45)).unwrap();
        let field = backend.create_field(&draft).await.unwrap();
        assert_eq!(field.default_time_per_question(), 45);

        let renamed = FieldDraft::new("Physics II", "", "JEE", None).unwrap();
        let updated = backend.update_field(field.id(), &renamed).await.unwrap();
        assert_eq!(updated.name(), "Physics II");
        // Missing time default keeps the stored one.
        assert_eq!(updated.default_time_per_question(), 45);

        backend.delete_field(field.id()).await.unwrap();
        assert!(backend.list_fields().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn question_create_appends_in_order() {
        let backend = InMemoryBackend::new();
        let field = backend
            .create_field(&FieldDraft::new("Maths", "", "", None).unwrap())
            .await
            .unwrap();

        for text in ["2+2?", "3+3?"] {
            let draft = QuestionDraft::new(
                QuestionKind::Mcq,
                text,
                vec!["4".into(), "6".into()],
                "4",
                None,
                None,
            )
            .unwrap();
            backend.create_question(field.id(), &draft).await.unwrap();
        }

        let questions = backend.questions_for_field(field.id()).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "2+2?");
        assert_eq!(questions[1].text(), "3+3?");
    }

    #[tokio::test]
    async fn unknown_field_serves_no_questions() {
        let backend = InMemoryBackend::new();
        let field = FieldId::new("missing").unwrap();
        assert!(backend.questions_for_field(&field).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn auth_flow_roundtrip() {
        let backend = InMemoryBackend::new();
        backend
            .register(&student_registration("priya@example.com"))
            .await
            .unwrap();

        backend.send_otp("priya@example.com").await.unwrap();
        assert!(
            backend
                .verify_otp("priya@example.com", "000000")
                .await
                .is_err()
        );
        backend
            .verify_otp("priya@example.com", InMemoryBackend::OTP)
            .await
            .unwrap();

        assert!(backend.login("priya@example.com", "wrong").await.is_err());
        let token = backend
            .login("priya@example.com", "secret123")
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert_eq!(backend.me().await.unwrap().email, "priya@example.com");
    }

    #[tokio::test]
    async fn payment_review_updates_status() {
        let backend = InMemoryBackend::new();
        let field = FieldId::new("f1").unwrap();
        let order = backend.create_order(&field).await.unwrap();
        backend
            .submit_utr(&order.order_id, "UTR0001", None)
            .await
            .unwrap();

        let pending = backend.pending_payments().await.unwrap();
        assert_eq!(pending.len(), 1);

        backend
            .review_payment(&pending[0].id, PaymentAction::Approve)
            .await
            .unwrap();
        assert!(backend.pending_payments().await.unwrap().is_empty());
    }
}
