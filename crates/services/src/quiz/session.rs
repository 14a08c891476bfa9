use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    AnswerSheet, AnswerSubmission, Field, Question, QuestionId, ScoredReport, SessionState,
};

use crate::error::QuizError;
use super::progress::QuizProgress;
use super::timer::{SessionTimer, TimerTick};

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed quiz attempt over a field's question set.
///
/// Owns the loaded questions, the answer sheet, the countdown timer, and
/// the attempt's state machine. Nothing else may mutate any of these; the
/// flow service drives submission through the `pub(crate)` transitions and
/// everything is discarded when the view goes away (no resume).
pub struct QuizSession {
    field: Field,
    questions: Vec<Question>,
    sheet: AnswerSheet,
    state: SessionState,
    timer: SessionTimer,
    participant: Option<String>,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    report: Option<ScoredReport>,
}

impl QuizSession {
    /// Creates an attempt in `NotStarted` with an all-empty answer sheet.
    ///
    /// An empty question list is a valid (if hollow) session: the view
    /// renders its no-questions state and [`QuizSession::begin`] refuses to
    /// start the clock.
    #[must_use]
    pub fn new(field: Field, questions: Vec<Question>) -> Self {
        let sheet = AnswerSheet::for_questions(&questions);
        Self {
            field,
            questions,
            sheet,
            state: SessionState::NotStarted,
            timer: SessionTimer::idle(),
            participant: None,
            started_at: None,
            submitted_at: None,
            report: None,
        }
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn participant(&self) -> Option<&str> {
        self.participant.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// The scored report, once fetched after an acknowledged submission.
    #[must_use]
    pub fn report(&self) -> Option<&ScoredReport> {
        self.report.as_ref()
    }

    /// The learner's current answer for a question.
    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&str> {
        self.sheet.answer(id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.sheet.answered_count()
    }

    /// Total seconds on the clock for this attempt: each question's own
    /// allocation, falling back to the field default.
    #[must_use]
    pub fn total_duration_seconds(&self) -> u32 {
        self.questions
            .iter()
            .map(|question| {
                question
                    .time_allocated()
                    .unwrap_or_else(|| self.field.default_time_per_question())
            })
            .sum()
    }

    /// Seconds left on the clock. Zero before the attempt starts.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining()
    }

    #[must_use]
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Returns a snapshot of the attempt for progress rendering.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total_questions: self.total_questions(),
            answered: self.answered_count(),
            remaining_seconds: self.remaining_seconds(),
            state: self.state,
        }
    }

    /// Manual submission is allowed once at least one question is answered.
    /// Timeout submission bypasses this gate.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::InProgress && self.sheet.answered_count() >= 1
    }

    /// Confirms the participant name and starts the clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyStarted` outside `NotStarted`,
    /// `QuizError::NoQuestions` for a hollow session, and
    /// `QuizError::EmptyName` for a blank name.
    pub fn begin(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), QuizError> {
        if self.state != SessionState::NotStarted {
            return Err(QuizError::AlreadyStarted);
        }
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::EmptyName);
        }

        self.participant = Some(name.to_string());
        self.started_at = Some(now);
        self.timer = SessionTimer::running(self.total_duration_seconds());
        self.state = SessionState::InProgress;
        Ok(())
    }

    /// Records (or clears, for an empty value) the learner's answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotStarted` before the attempt begins,
    /// `QuizError::AnswersLocked` once it leaves `InProgress`, and
    /// `QuizError::UnknownQuestion` for a question outside this quiz.
    pub fn record_answer(
        &mut self,
        id: &QuestionId,
        value: impl Into<String>,
    ) -> Result<(), QuizError> {
        match self.state {
            SessionState::InProgress => {}
            SessionState::NotStarted => return Err(QuizError::NotStarted),
            _ => return Err(QuizError::AnswersLocked),
        }
        if !self.sheet.set_answer(id, value) {
            return Err(QuizError::UnknownQuestion(id.clone()));
        }
        Ok(())
    }

    /// Advances the clock by one second.
    ///
    /// Guarded on the session state, not just the timer: once the attempt
    /// leaves `InProgress`, a stale tick scheduled before the transition is
    /// inert even if the timer has not been cancelled yet (a submission may
    /// be in flight).
    pub fn tick(&mut self) -> TimerTick {
        if self.state != SessionState::InProgress {
            return TimerTick::Inert;
        }
        self.timer.tick()
    }

    /// Builds the grading payload from the current sheet.
    pub(crate) fn submission(&self) -> Result<AnswerSubmission, QuizError> {
        let participant = self
            .participant
            .clone()
            .ok_or(QuizError::NotStarted)?;
        Ok(AnswerSubmission {
            field_id: self.field.id().clone(),
            user_name: participant,
            answers: self.sheet.submission_entries(),
        })
    }

    pub(crate) fn mark_submitting(&mut self) {
        self.state = SessionState::Submitting;
    }

    pub(crate) fn mark_submitted(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::Submitted;
        self.submitted_at = Some(now);
        self.timer.cancel();
    }

    /// Resolves a failed dispatch: back to `InProgress` while the clock
    /// still has time, terminal-but-retryable otherwise.
    pub(crate) fn resolve_failed_dispatch(&mut self) {
        if self.timer.is_running() && self.timer.remaining() > 0 {
            self.state = SessionState::InProgress;
        } else {
            self.timer.cancel();
            self.state = SessionState::SubmissionFailed;
        }
    }

    pub(crate) fn set_report(&mut self, report: ScoredReport) {
        self.report = Some(report);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("field_id", self.field.id())
            .field("questions_len", &self.questions.len())
            .field("answered", &self.sheet.answered_count())
            .field("state", &self.state)
            .field("timer", &self.timer.state())
            .field("participant", &self.participant)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::timer::TimerState;
    use quiz_core::model::{FieldId, QuestionKind};
    use quiz_core::time::fixed_now;

    fn field() -> Field {
        Field::new(FieldId::new("f1").unwrap(), "Physics", "", "JEE", 60).unwrap()
    }

    fn mcq(id: &str, time_allocated: Option<u32>) -> Question {
        Question::new(
            QuestionId::new(id).unwrap(),
            FieldId::new("f1").unwrap(),
            QuestionKind::Mcq,
            "2+2?",
            vec!["A".into(), "B".into()],
            None,
            time_allocated,
            fixed_now(),
        )
        .unwrap()
    }

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[test]
    fn duration_sums_allocations_with_field_fallback() {
        let session = QuizSession::new(field(), vec![mcq("q1", Some(90)), mcq("q2", None)]);
        assert_eq!(session.total_duration_seconds(), 150);
    }

    #[test]
    fn begin_requires_a_name_and_questions() {
        let mut hollow = QuizSession::new(field(), Vec::new());
        assert!(matches!(
            hollow.begin("Priya", fixed_now()),
            Err(QuizError::NoQuestions)
        ));

        let mut session = QuizSession::new(field(), vec![mcq("q1", None)]);
        assert!(matches!(
            session.begin("   ", fixed_now()),
            Err(QuizError::EmptyName)
        ));

        session.begin("Priya", fixed_now()).unwrap();
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.participant(), Some("Priya"));
        assert_eq!(session.remaining_seconds(), 60);

        assert!(matches!(
            session.begin("Again", fixed_now()),
            Err(QuizError::AlreadyStarted)
        ));
    }

    #[test]
    fn answers_are_rejected_outside_in_progress() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", None)]);
        assert!(matches!(
            session.record_answer(&qid("q1"), "A"),
            Err(QuizError::NotStarted)
        ));

        session.begin("Priya", fixed_now()).unwrap();
        session.record_answer(&qid("q1"), "A").unwrap();
        assert_eq!(session.answer(&qid("q1")), Some("A"));

        session.mark_submitting();
        assert!(matches!(
            session.record_answer(&qid("q1"), "B"),
            Err(QuizError::AnswersLocked)
        ));
        // The buffered answer is untouched by the rejected write.
        assert_eq!(session.answer(&qid("q1")), Some("A"));
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", None)]);
        session.begin("Priya", fixed_now()).unwrap();
        assert!(matches!(
            session.record_answer(&qid("stranger"), "A"),
            Err(QuizError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn manual_submit_gate_requires_one_answer() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", None), mcq("q2", None)]);
        assert!(!session.can_submit());

        session.begin("Priya", fixed_now()).unwrap();
        assert!(!session.can_submit());

        session.record_answer(&qid("q1"), "A").unwrap();
        assert!(session.can_submit());

        session.record_answer(&qid("q1"), "").unwrap();
        assert!(!session.can_submit());
    }

    #[test]
    fn ticks_are_inert_outside_in_progress() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", Some(10))]);
        assert_eq!(session.tick(), TimerTick::Inert);

        session.begin("Priya", fixed_now()).unwrap();
        assert_eq!(session.tick(), TimerTick::Ticked { remaining: 9 });

        // A submission goes in flight; the scheduled tick must do nothing
        // even though the timer itself has not been cancelled yet.
        session.mark_submitting();
        assert_eq!(session.tick(), TimerTick::Inert);
        assert_eq!(session.remaining_seconds(), 9);
    }

    #[test]
    fn expiry_fires_once_after_full_countdown() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", Some(1800))]);
        session.begin("Priya", fixed_now()).unwrap();

        let mut expirations = 0;
        for _ in 0..1800 {
            if session.tick() == TimerTick::Expired {
                expirations += 1;
            }
        }
        assert_eq!(expirations, 1);
        assert_eq!(session.remaining_seconds(), 0);
    }

    #[test]
    fn failed_dispatch_returns_to_in_progress_with_time_left() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", Some(10))]);
        session.begin("Priya", fixed_now()).unwrap();
        session.record_answer(&qid("q1"), "A").unwrap();

        session.mark_submitting();
        session.resolve_failed_dispatch();
        assert_eq!(session.state(), SessionState::InProgress);
        assert!(session.timer().is_running());
    }

    #[test]
    fn failed_dispatch_after_expiry_is_terminal_but_retryable() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", Some(1))]);
        session.begin("Priya", fixed_now()).unwrap();
        assert_eq!(session.tick(), TimerTick::Expired);

        session.mark_submitting();
        session.resolve_failed_dispatch();
        assert_eq!(session.state(), SessionState::SubmissionFailed);
        assert_eq!(session.timer().state(), TimerState::Expired);
    }

    #[test]
    fn submitted_cancels_the_clock() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", Some(10))]);
        session.begin("Priya", fixed_now()).unwrap();
        session.mark_submitting();
        session.mark_submitted(fixed_now());

        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(session.timer().state(), TimerState::Cancelled);
        assert_eq!(session.submitted_at(), Some(fixed_now()));
        assert_eq!(session.tick(), TimerTick::Inert);
    }

    #[test]
    fn submission_payload_carries_name_and_answered_entries() {
        let mut session = QuizSession::new(field(), vec![mcq("q1", None), mcq("q2", None)]);
        session.begin("Priya", fixed_now()).unwrap();
        session.record_answer(&qid("q2"), "B").unwrap();

        let payload = session.submission().unwrap();
        assert_eq!(payload.field_id.as_str(), "f1");
        assert_eq!(payload.user_name, "Priya");
        assert_eq!(payload.answers.len(), 1);
        assert_eq!(payload.answers[0].question_id, qid("q2"));
        assert_eq!(payload.answers[0].answer, "B");
    }
}
