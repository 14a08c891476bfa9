use std::sync::Arc;

use tracing::{debug, warn};

use api::{FieldsApi, QuestionsApi};
use quiz_core::Clock;
use quiz_core::model::{FieldId, SessionState};

use crate::error::QuizError;
use super::session::QuizSession;

/// Result of an acknowledged submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submission acknowledged and the scored report is on the session.
    Accepted,
    /// Submission acknowledged but the report fetch failed; the session
    /// stays `Submitted` with a degraded, report-less display.
    ReportUnavailable,
}

/// Orchestrates the quiz attempt against the backend: load, submit
/// (manual, timeout, retry), and report retrieval.
///
/// Submission is one-shot per attempt. Every dispatch path first checks the
/// session state, so a timer expiry racing a manual click (or a rapid
/// double-click) produces exactly one request.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    fields: Arc<dyn FieldsApi>,
    questions: Arc<dyn QuestionsApi>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(clock: Clock, fields: Arc<dyn FieldsApi>, questions: Arc<dyn QuestionsApi>) -> Self {
        Self {
            clock,
            fields,
            questions,
        }
    }

    /// Fetches the field and its question set and builds a fresh session.
    ///
    /// A response without questions yields a session over an empty list:
    /// the no-questions view state, not an error.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownField` when the field does not exist and
    /// `QuizError::Api` for transport failures.
    pub async fn load(&self, field_id: &FieldId) -> Result<QuizSession, QuizError> {
        let field = self
            .fields
            .list_fields()
            .await?
            .into_iter()
            .find(|field| field.id() == field_id)
            .ok_or_else(|| QuizError::UnknownField(field_id.clone()))?;
        let questions = self.questions.questions_for_field(field_id).await?;
        debug!(field = %field_id, questions = questions.len(), "quiz loaded");
        Ok(QuizSession::new(field, questions))
    }

    /// Manual submission. Requires an in-progress attempt with at least one
    /// answered question; a failed earlier dispatch may also be re-sent
    /// from here.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NothingAnswered` below the gate, a state error
    /// when dispatch is not allowed, and `QuizError::Api`/
    /// `QuizError::NotAcknowledged` for failed dispatches (the session then
    /// reflects the failure state).
    pub async fn submit(&self, session: &mut QuizSession) -> Result<SubmitOutcome, QuizError> {
        match session.state() {
            SessionState::InProgress => {
                if session.answered_count() == 0 {
                    return Err(QuizError::NothingAnswered);
                }
            }
            // The submit control doubles as the retry control after a
            // failed dispatch; the gate already passed the first time.
            SessionState::SubmissionFailed => {}
            SessionState::NotStarted => return Err(QuizError::NotStarted),
            SessionState::Submitting => return Err(QuizError::SubmissionInFlight),
            SessionState::Submitted => return Err(QuizError::AlreadySubmitted),
        }
        self.dispatch(session).await
    }

    /// Timeout submission: sends whatever the sheet holds at expiry, even
    /// nothing at all.
    ///
    /// # Errors
    ///
    /// Returns a state error when the attempt is not `InProgress` (a
    /// manual submit already won the race) and dispatch errors otherwise.
    pub async fn submit_on_timeout(
        &self,
        session: &mut QuizSession,
    ) -> Result<SubmitOutcome, QuizError> {
        match session.state() {
            SessionState::InProgress => {}
            SessionState::NotStarted => return Err(QuizError::NotStarted),
            SessionState::Submitting => return Err(QuizError::SubmissionInFlight),
            SessionState::Submitted => return Err(QuizError::AlreadySubmitted),
            SessionState::SubmissionFailed => return Err(QuizError::NotRetryable),
        }
        self.dispatch(session).await
    }

    /// Re-sends the payload after a failed dispatch.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRetryable` outside `SubmissionFailed` and
    /// dispatch errors otherwise.
    pub async fn retry_submission(
        &self,
        session: &mut QuizSession,
    ) -> Result<SubmitOutcome, QuizError> {
        if session.state() != SessionState::SubmissionFailed {
            return Err(QuizError::NotRetryable);
        }
        self.dispatch(session).await
    }

    /// Fetches the scored report for an already-acknowledged submission,
    /// for the degraded no-report display's retry action.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotSubmitted` before acknowledgement and
    /// `QuizError::Api` when the backend fails again.
    pub async fn fetch_report(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        if session.state() != SessionState::Submitted {
            return Err(QuizError::NotSubmitted);
        }
        let report = self.questions.progress_report(session.field().id()).await?;
        session.set_report(report);
        Ok(())
    }

    /// The single dispatch path shared by manual, timeout, and retry
    /// submission. Callers have already validated the session state.
    async fn dispatch(&self, session: &mut QuizSession) -> Result<SubmitOutcome, QuizError> {
        let submission = session.submission()?;
        session.mark_submitting();
        debug!(
            field = %submission.field_id,
            answers = submission.answers.len(),
            "dispatching quiz submission"
        );

        match self.questions.submit_answers(&submission).await {
            Ok(true) => session.mark_submitted(self.clock.now()),
            Ok(false) => {
                session.resolve_failed_dispatch();
                return Err(QuizError::NotAcknowledged);
            }
            Err(err) => {
                session.resolve_failed_dispatch();
                return Err(err.into());
            }
        }

        // Acknowledged; the grading read happens strictly after. Its
        // failure degrades the display but never rolls the session back.
        match self.questions.progress_report(session.field().id()).await {
            Ok(report) => {
                session.set_report(report);
                Ok(SubmitOutcome::Accepted)
            }
            Err(err) => {
                warn!(%err, "submission acknowledged but report fetch failed");
                Ok(SubmitOutcome::ReportUnavailable)
            }
        }
    }
}
