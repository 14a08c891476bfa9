use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::model::ids::{FieldId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("multiple-choice questions need at least 2 options, got {got}")]
    NotEnoughOptions { got: usize },

    #[error("descriptive questions cannot carry options")]
    UnexpectedOptions,

    #[error("duplicate option text: {text}")]
    DuplicateOption { text: String },

    #[error("correct answer must match one of the options")]
    CorrectAnswerNotAnOption,

    #[error("time allocated must be > 0 when set")]
    InvalidTimeAllocated,
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// The two question shapes the platform supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Descriptive,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Mcq => write!(f, "mcq"),
            QuestionKind::Descriptive => write!(f, "descriptive"),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single question as served for a quiz attempt.
///
/// Immutable for the duration of a session once fetched. The authoritative
/// correct answer stays server-side; at most a solution text travels to the
/// client for post-grading display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    field_id: FieldId,
    kind: QuestionKind,
    text: String,
    options: Vec<String>,
    solution: Option<String>,
    time_allocated: Option<u32>,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Builds a question from backend data.
    ///
    /// Loading is tolerant of duplicate option texts (the backend may serve
    /// them); only authoring rejects duplicates, via [`QuestionDraft`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, the option list does not
    /// match the kind, or the time allocation is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        field_id: FieldId,
        kind: QuestionKind,
        text: impl Into<String>,
        options: Vec<String>,
        solution: Option<String>,
        time_allocated: Option<u32>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        match kind {
            QuestionKind::Mcq if options.len() < 2 => {
                return Err(QuestionError::NotEnoughOptions { got: options.len() });
            }
            QuestionKind::Descriptive if !options.is_empty() => {
                return Err(QuestionError::UnexpectedOptions);
            }
            _ => {}
        }
        if time_allocated == Some(0) {
            return Err(QuestionError::InvalidTimeAllocated);
        }

        Ok(Self {
            id,
            field_id,
            kind,
            text,
            options,
            solution,
            time_allocated,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Ordered option display texts. Empty for descriptive questions.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    /// Per-question time override in seconds, if the author set one.
    #[must_use]
    pub fn time_allocated(&self) -> Option<u32> {
        self.time_allocated
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Admin-entered data for creating a question.
///
/// Stricter than [`Question::new`]: because answers are matched by option
/// display text, two options with the same text would be indistinguishable
/// at grading time, so duplicates are rejected here, and the MCQ correct
/// answer must be one of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    kind: QuestionKind,
    text: String,
    options: Vec<String>,
    correct_answer: String,
    solution: Option<String>,
    time_allocated: Option<u32>,
}

impl QuestionDraft {
    /// Validates admin input for a new question.
    ///
    /// Blank options are dropped before validation, matching the authoring
    /// form which keeps empty option rows around while editing.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank text, bad option counts, duplicate
    /// option texts, an MCQ correct answer that is not an option, or a zero
    /// time allocation.
    pub fn new(
        kind: QuestionKind,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        solution: Option<String>,
        time_allocated: Option<u32>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options: Vec<String> = options
            .into_iter()
            .filter(|option| !option.trim().is_empty())
            .collect();

        match kind {
            QuestionKind::Mcq => {
                if options.len() < 2 {
                    return Err(QuestionError::NotEnoughOptions { got: options.len() });
                }
                let mut seen = HashSet::new();
                for option in &options {
                    if !seen.insert(option.as_str()) {
                        return Err(QuestionError::DuplicateOption {
                            text: option.clone(),
                        });
                    }
                }
                if !options.iter().any(|option| *option == correct_answer) {
                    return Err(QuestionError::CorrectAnswerNotAnOption);
                }
            }
            QuestionKind::Descriptive => {
                if !options.is_empty() {
                    return Err(QuestionError::UnexpectedOptions);
                }
            }
        }
        if time_allocated == Some(0) {
            return Err(QuestionError::InvalidTimeAllocated);
        }

        Ok(Self {
            kind,
            text,
            options,
            correct_answer,
            solution,
            time_allocated,
        })
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    #[must_use]
    pub fn time_allocated(&self) -> Option<u32> {
        self.time_allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn ids() -> (QuestionId, FieldId) {
        (QuestionId::new("q1").unwrap(), FieldId::new("f1").unwrap())
    }

    #[test]
    fn mcq_needs_two_options() {
        let (id, field_id) = ids();
        let err = Question::new(
            id,
            field_id,
            QuestionKind::Mcq,
            "2+2?",
            vec!["4".into()],
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::NotEnoughOptions { got: 1 });
    }

    #[test]
    fn descriptive_rejects_options() {
        let (id, field_id) = ids();
        let err = Question::new(
            id,
            field_id,
            QuestionKind::Descriptive,
            "Explain inertia.",
            vec!["A".into()],
            None,
            None,
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnexpectedOptions);
    }

    #[test]
    fn question_tolerates_duplicate_options_on_read() {
        let (id, field_id) = ids();
        let question = Question::new(
            id,
            field_id,
            QuestionKind::Mcq,
            "Pick one",
            vec!["A".into(), "A".into()],
            None,
            None,
            fixed_now(),
        );
        assert!(question.is_ok());
    }

    #[test]
    fn draft_rejects_duplicate_options() {
        let err = QuestionDraft::new(
            QuestionKind::Mcq,
            "Pick one",
            vec!["A".into(), "A".into()],
            "A",
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption { text: "A".into() });
    }

    #[test]
    fn draft_requires_correct_answer_among_options() {
        let err = QuestionDraft::new(
            QuestionKind::Mcq,
            "2+2?",
            vec!["3".into(), "4".into()],
            "5",
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerNotAnOption);
    }

    #[test]
    fn draft_drops_blank_option_rows() {
        let draft = QuestionDraft::new(
            QuestionKind::Mcq,
            "2+2?",
            vec!["3".into(), "".into(), "4".into(), "  ".into()],
            "4",
            Some("Basic arithmetic".into()),
            Some(30),
        )
        .unwrap();
        assert_eq!(draft.options(), ["3", "4"]);
    }

    #[test]
    fn zero_time_allocation_is_rejected() {
        let err = QuestionDraft::new(
            QuestionKind::Descriptive,
            "Explain.",
            Vec::new(),
            "",
            None,
            Some(0),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidTimeAllocated);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(QuestionKind::Mcq.to_string(), "mcq");
        assert_eq!(QuestionKind::Descriptive.to_string(), "descriptive");
    }
}
