use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("correct count ({correct}) exceeds answered count ({answered})")]
    CountMismatch { correct: u32, answered: u32 },
}

/// One graded entry from the server's progress report.
///
/// The question fields are a snapshot as it existed at grading time; the
/// live question may since have been edited or deleted. `graded_at` is the
/// entry's creation timestamp, used when collapsing duplicate entries for
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: QuestionId,
    pub question_text: String,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub correct_answer: Option<String>,
    pub graded_at: DateTime<Utc>,
}

/// The server's scored view of a submitted attempt.
///
/// Read-only to the client: correctness is never recomputed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredReport {
    total_answered: u32,
    total_correct: u32,
    entries: Vec<GradedAnswer>,
}

impl ScoredReport {
    /// Rehydrates a report from backend data.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CountMismatch` when the correct count exceeds
    /// the answered count.
    pub fn from_parts(
        total_answered: u32,
        total_correct: u32,
        entries: Vec<GradedAnswer>,
    ) -> Result<Self, ReportError> {
        if total_correct > total_answered {
            return Err(ReportError::CountMismatch {
                correct: total_correct,
                answered: total_answered,
            });
        }

        Ok(Self {
            total_answered,
            total_correct,
            entries,
        })
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    /// Graded entries in server order, duplicates included. Display-level
    /// collapsing is a renderer concern.
    #[must_use]
    pub fn entries(&self) -> &[GradedAnswer] {
        &self.entries
    }
}
