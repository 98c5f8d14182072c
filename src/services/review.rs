use crate::schemas::quiz::Question;
use crate::services::answer_code::{AnswerCode, AnswerLetter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionMark {
    /// The key, whether or not it was chosen.
    Correct,
    ChosenIncorrect,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReviewedOption {
    pub(crate) text: String,
    pub(crate) mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReviewedQuestion {
    pub(crate) text: String,
    pub(crate) options: Vec<ReviewedOption>,
    pub(crate) chosen: Option<AnswerLetter>,
    pub(crate) key: Option<AnswerLetter>,
}

impl ReviewedQuestion {
    pub(crate) fn answered_correctly(&self) -> bool {
        self.key.is_some() && self.chosen == self.key
    }
}

/// Read-only projection of a quiz against a stored attempt. Without an
/// attempt (teacher view) only the key is marked.
pub(crate) fn review(
    questions: &[Question],
    attempt: Option<&AnswerCode>,
) -> Vec<ReviewedQuestion> {
    questions
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let key = question.correct_answer;
            let chosen = attempt.and_then(|code| code.get(position));
            let options = question
                .options
                .iter()
                .enumerate()
                .map(|(index, text)| {
                    let letter = AnswerLetter::from_index(index).ok();
                    let mark = match letter {
                        Some(letter) if key == Some(letter) => OptionMark::Correct,
                        Some(letter) if chosen == Some(letter) => OptionMark::ChosenIncorrect,
                        _ => OptionMark::Neutral,
                    };
                    ReviewedOption { text: text.clone(), mark }
                })
                .collect();

            ReviewedQuestion { text: question.question_text.clone(), options, chosen, key }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReviewSummary {
    pub(crate) correct: usize,
    pub(crate) total: usize,
}

pub(crate) fn summarize(reviewed: &[ReviewedQuestion]) -> ReviewSummary {
    ReviewSummary {
        correct: reviewed.iter().filter(|question| question.answered_correctly()).count(),
        total: reviewed.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(text: &str, key: AnswerLetter) -> Question {
        Question {
            question_text: text.to_string(),
            options: vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct_answer: Some(key),
        }
    }

    fn marks(question: &ReviewedQuestion) -> Vec<OptionMark> {
        question.options.iter().map(|option| option.mark).collect()
    }

    #[test]
    fn marks_key_and_wrong_choice() {
        let questions = vec![keyed("one", AnswerLetter::A), keyed("two", AnswerLetter::C)];
        let attempt = AnswerCode::parse("AB").expect("code");

        let reviewed = review(&questions, Some(&attempt));

        use OptionMark::*;
        assert_eq!(marks(&reviewed[0]), vec![Correct, Neutral, Neutral, Neutral]);
        assert_eq!(marks(&reviewed[1]), vec![Neutral, ChosenIncorrect, Correct, Neutral]);
        assert_eq!(summarize(&reviewed), ReviewSummary { correct: 1, total: 2 });
    }

    #[test]
    fn teacher_view_marks_only_the_key() {
        let questions = vec![keyed("one", AnswerLetter::D)];
        let reviewed = review(&questions, None);

        use OptionMark::*;
        assert_eq!(marks(&reviewed[0]), vec![Neutral, Neutral, Neutral, Correct]);
        assert!(reviewed[0].chosen.is_none());
    }

    #[test]
    fn short_attempt_leaves_trailing_questions_unchosen() {
        let questions = vec![keyed("one", AnswerLetter::B), keyed("two", AnswerLetter::B)];
        let attempt = AnswerCode::parse("B").expect("code");
        let reviewed = review(&questions, Some(&attempt));

        assert!(reviewed[0].answered_correctly());
        assert!(!reviewed[1].answered_correctly());
        assert!(!marks(&reviewed[1]).contains(&OptionMark::ChosenIncorrect));
    }

    #[test]
    fn options_beyond_the_alphabet_stay_neutral() {
        let mut question = keyed("five", AnswerLetter::A);
        question.options.push("v".into());
        let reviewed = review(&[question], None);
        assert_eq!(reviewed[0].options[4].mark, OptionMark::Neutral);
    }
}
