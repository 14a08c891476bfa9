use chrono::Utc;

use quiz_core::model::{Question, QuestionId, ScoredReport, SessionState};
use services::{QuizError, QuizFlowService, QuizProgress, QuizSession, SubmitOutcome, TimerTick};

/// What the quiz view can ask the session to do.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizIntent {
    Begin { name: String },
    Answer { question_id: QuestionId, value: String },
    Submit,
    RetrySubmission,
    FetchReport,
}

/// Result of a submission intent, for completion handling in the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Submitted { report_ready: bool },
}

/// View-model for one quiz attempt: the session plus the async calls the
/// view dispatches against it.
pub struct QuizVm {
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn field_name(&self) -> &str {
        self.session.field().name()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.session.questions()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.session.answered_count()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.session.remaining_seconds()
    }

    /// Seconds the clock will start with, for the pre-start summary.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u32 {
        self.session.total_duration_seconds()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.session.progress()
    }

    /// Answered fraction as a whole percentage for the progress bar.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn progress_percent(&self) -> u32 {
        (self.session.progress().fraction() * 100.0).round() as u32
    }

    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&str> {
        self.session.answer(id)
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.session.can_submit()
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoredReport> {
        self.session.report()
    }

    /// Confirms the name and starts the clock.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` with its user-facing message.
    pub fn begin(&mut self, name: &str) -> Result<(), QuizError> {
        self.session.begin(name, Utc::now())
    }

    /// Buffers the learner's answer for a question.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` with its user-facing message.
    pub fn record_answer(&mut self, id: &QuestionId, value: String) -> Result<(), QuizError> {
        self.session.record_answer(id, value)
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TimerTick {
        self.session.tick()
    }

    /// Manual submission (also re-sends after a failed dispatch).
    ///
    /// # Errors
    ///
    /// Propagates `QuizError`; the session state already reflects the
    /// failure when this returns an error.
    pub async fn submit(&mut self, flow: &QuizFlowService) -> Result<QuizOutcome, QuizError> {
        let outcome = flow.submit(&mut self.session).await?;
        Ok(QuizOutcome::Submitted {
            report_ready: outcome == SubmitOutcome::Accepted,
        })
    }

    /// Auto-submission on timer expiry.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError`. `AlreadySubmitted`/`SubmissionInFlight`
    /// just mean a manual submit won the race; callers may ignore those.
    pub async fn submit_on_timeout(
        &mut self,
        flow: &QuizFlowService,
    ) -> Result<QuizOutcome, QuizError> {
        let outcome = flow.submit_on_timeout(&mut self.session).await?;
        Ok(QuizOutcome::Submitted {
            report_ready: outcome == SubmitOutcome::Accepted,
        })
    }

    /// Fetches the report after a degraded (report-less) submission.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError`.
    pub async fn fetch_report(&mut self, flow: &QuizFlowService) -> Result<(), QuizError> {
        flow.fetch_report(&mut self.session).await
    }
}
