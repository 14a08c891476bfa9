use serde::Serialize;
use std::collections::HashMap;

use crate::model::ids::{FieldId, QuestionId};
use crate::model::question::Question;

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// The learner's working answers for one quiz attempt.
///
/// Keyed by question identifier rather than list position, so a refetch or
/// reorder of the question list cannot silently shift answers onto the wrong
/// questions. Question order is preserved separately for payload assembly
/// and progress rendering.
///
/// A slot is "answered" once it holds a non-empty string; writing an empty
/// string reverts it to unanswered. Writes are last-write-wins per slot and
/// independent across slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    order: Vec<QuestionId>,
    answers: HashMap<QuestionId, String>,
}

impl AnswerSheet {
    /// Creates an all-empty sheet with one slot per question, in question
    /// order.
    #[must_use]
    pub fn for_questions(questions: &[Question]) -> Self {
        Self {
            order: questions.iter().map(|q| q.id().clone()).collect(),
            answers: HashMap::new(),
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// True when the sheet tracks no questions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of non-empty slots.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Fraction of slots answered, for progress rendering. Zero for an
    /// empty sheet.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        if self.order.is_empty() {
            return 0.0;
        }
        self.answered_count() as f64 / self.order.len() as f64
    }

    /// The current answer for a question, if it has one.
    #[must_use]
    pub fn answer(&self, id: &QuestionId) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, id: &QuestionId) -> bool {
        self.answers.contains_key(id)
    }

    /// Records the learner's answer for a question.
    ///
    /// Last write wins. An empty (or whitespace-only) value clears the slot.
    /// Returns `false` when the sheet does not track the question, in which
    /// case nothing changes.
    pub fn set_answer(&mut self, id: &QuestionId, value: impl Into<String>) -> bool {
        if !self.order.contains(id) {
            return false;
        }
        let value = value.into();
        if value.trim().is_empty() {
            self.answers.remove(id);
        } else {
            self.answers.insert(id.clone(), value);
        }
        true
    }

    /// Answered `{question_id, answer}` pairs in question order.
    ///
    /// Unanswered slots are omitted, so zero answered yields an empty,
    /// well-formed list.
    #[must_use]
    pub fn submission_entries(&self) -> Vec<AnswerEntry> {
        self.order
            .iter()
            .filter_map(|id| {
                self.answers.get(id).map(|answer| AnswerEntry {
                    question_id: id.clone(),
                    answer: answer.clone(),
                })
            })
            .collect()
    }
}

//
// ─── SUBMISSION PAYLOAD ────────────────────────────────────────────────────────
//

/// One graded-answer pair in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub answer: String,
}

/// The complete request body for submitting a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub field_id: FieldId,
    pub user_name: String,
    pub answers: Vec<AnswerEntry>,
}
