use quiz_core::model::SessionState;

/// Aggregated view of quiz attempt progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total_questions: usize,
    pub answered: usize,
    pub remaining_seconds: u32,
    pub state: SessionState,
}

impl QuizProgress {
    /// Fraction of questions answered, for progress-bar rendering.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total_questions as f64
    }
}
