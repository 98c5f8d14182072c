use std::fmt;

use crate::schemas::quiz::SubmissionResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreReport {
    pub(crate) score: usize,
    pub(crate) total: usize,
    /// Already rounded to one decimal place.
    pub(crate) percentage: f64,
}

impl ScoreReport {
    pub(crate) fn new(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (score as f64 / total as f64 * 1000.0).round() / 10.0
        };
        Self { score, total, percentage }
    }

    /// `66.7%`
    pub(crate) fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You got a {} out of {}, which is: {}",
            self.score,
            self.total,
            self.percentage_label()
        )
    }
}

/// Position-wise matches over the overlapping prefix.
pub(crate) fn count_matches<T: PartialEq>(correct: &[T], submitted: &[T]) -> usize {
    correct.iter().zip(submitted).filter(|(expected, given)| expected == given).count()
}

fn normalize_letter(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// The backend echoes the submitted code as `["ABB"]`; split it back into
/// one entry per question before comparing with the per-question key.
fn submitted_letters(user_answers: &[String]) -> Vec<String> {
    user_answers
        .iter()
        .flat_map(|entry| entry.chars())
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .map(|ch| ch.to_ascii_uppercase().to_string())
        .collect()
}

/// `total` is the number of questions in the attempt, not the length of the
/// server's key.
pub(crate) fn score_submission(result: &SubmissionResult, total: usize) -> ScoreReport {
    let correct: Vec<String> =
        result.correct_answers.iter().map(|item| normalize_letter(item)).collect();
    let submitted = submitted_letters(&result.user_answers);
    ScoreReport::new(count_matches(&correct, &submitted), total)
}
