use std::fmt;

/// Lifecycle of one quiz attempt.
///
/// `Submitting` and `Submitted` are deliberately distinct: a request in
/// flight is not an acknowledged submission, and only the server's
/// acknowledgement moves the attempt into its terminal display phase. A
/// failed dispatch falls back to `InProgress` while the clock still has
/// time, or to `SubmissionFailed` (retryable) once it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Questions are loaded; the learner has not confirmed a name yet.
    NotStarted,
    /// The clock is running and the answer sheet accepts writes.
    InProgress,
    /// A submission request is in flight; the sheet is frozen.
    Submitting,
    /// The server acknowledged the submission. Terminal.
    Submitted,
    /// Dispatch failed with no time left on the clock; retry is offered.
    SubmissionFailed,
}

impl SessionState {
    /// True while the learner can still edit answers.
    #[must_use]
    pub fn accepts_answers(self) -> bool {
        matches!(self, SessionState::InProgress)
    }

    /// True once no further submission may ever be dispatched.
    #[must_use]
    pub fn is_submitted(self) -> bool {
        matches!(self, SessionState::Submitted)
    }

    /// True when a dispatch could be started from this state.
    #[must_use]
    pub fn can_dispatch(self) -> bool {
        matches!(
            self,
            SessionState::InProgress | SessionState::SubmissionFailed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Submitting => "submitting",
            SessionState::Submitted => "submitted",
            SessionState::SubmissionFailed => "submission failed",
        };
        write!(f, "{label}")
    }
}
