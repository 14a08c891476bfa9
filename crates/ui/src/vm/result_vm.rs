use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{GradedAnswer, QuestionId, ScoredReport};

/// One row of the per-question breakdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRowVm {
    pub question_id: QuestionId,
    pub question_text: String,
    pub submitted_answer: String,
    pub is_correct: bool,
    /// Shown only when the answer was wrong.
    pub correct_answer: Option<String>,
}

/// Display mapping of a scored report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub total_answered: u32,
    pub total_correct: u32,
    pub rows: Vec<ResultRowVm>,
}

fn row_from(entry: &GradedAnswer) -> ResultRowVm {
    ResultRowVm {
        question_id: entry.question_id.clone(),
        question_text: entry.question_text.clone(),
        submitted_answer: entry.submitted_answer.clone(),
        is_correct: entry.is_correct,
        correct_answer: if entry.is_correct {
            None
        } else {
            entry.correct_answer.clone()
        },
    }
}

/// Maps a scored report to display rows.
///
/// When the report carries several graded entries for the same question
/// (question edits create new versions), only the most recently created
/// entry survives; on equal timestamps the later entry wins. Each question
/// keeps the position of its first appearance. This collapses duplicates
/// for display only; the counts come from the server untouched.
#[must_use]
pub fn map_report(report: &ScoredReport) -> ResultVm {
    let mut rows: Vec<(DateTime<Utc>, ResultRowVm)> = Vec::new();
    let mut position: HashMap<QuestionId, usize> = HashMap::new();

    for entry in report.entries() {
        match position.get(&entry.question_id) {
            Some(&at) => {
                if entry.graded_at >= rows[at].0 {
                    rows[at] = (entry.graded_at, row_from(entry));
                }
            }
            None => {
                position.insert(entry.question_id.clone(), rows.len());
                rows.push((entry.graded_at, row_from(entry)));
            }
        }
    }

    ResultVm {
        total_answered: report.total_answered(),
        total_correct: report.total_correct(),
        rows: rows.into_iter().map(|(_, row)| row).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;

    fn entry(id: &str, answer: &str, graded_at: DateTime<Utc>) -> GradedAnswer {
        GradedAnswer {
            question_id: QuestionId::new(id).unwrap(),
            question_text: "2+2?".into(),
            submitted_answer: answer.into(),
            is_correct: false,
            correct_answer: Some("4".into()),
            graded_at,
        }
    }

    #[test]
    fn duplicate_question_keeps_latest_entry() {
        let old = entry("q1", "3", fixed_now());
        let new = entry("q1", "4", fixed_now() + Duration::minutes(5));
        let report = ScoredReport::from_parts(2, 0, vec![old, new]).unwrap();

        let vm = map_report(&report);
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].submitted_answer, "4");
    }

    #[test]
    fn latest_wins_regardless_of_server_order() {
        let newer = entry("q1", "4", fixed_now() + Duration::minutes(5));
        let older = entry("q1", "3", fixed_now());
        let report = ScoredReport::from_parts(2, 0, vec![newer, older]).unwrap();

        let vm = map_report(&report);
        assert_eq!(vm.rows.len(), 1);
        assert_eq!(vm.rows[0].submitted_answer, "4");
    }

    #[test]
    fn collapsed_question_keeps_first_position() {
        let report = ScoredReport::from_parts(
            3,
            0,
            vec![
                entry("q1", "a", fixed_now()),
                entry("q2", "b", fixed_now()),
                entry("q1", "c", fixed_now() + Duration::minutes(1)),
            ],
        )
        .unwrap();

        let vm = map_report(&report);
        assert_eq!(vm.rows.len(), 2);
        assert_eq!(vm.rows[0].question_id.as_str(), "q1");
        assert_eq!(vm.rows[0].submitted_answer, "c");
        assert_eq!(vm.rows[1].question_id.as_str(), "q2");
    }

    #[test]
    fn correct_rows_hide_the_correct_answer() {
        let mut graded = entry("q1", "4", fixed_now());
        graded.is_correct = true;
        let report = ScoredReport::from_parts(1, 1, vec![graded]).unwrap();

        let vm = map_report(&report);
        assert_eq!(vm.rows[0].correct_answer, None);
        assert_eq!(vm.total_correct, 1);
    }
}
