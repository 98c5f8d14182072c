use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::services::answer_code::{AnswerCode, AnswerLetter};

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Question {
    pub(crate) question_text: String,
    #[serde(default)]
    pub(crate) options: Vec<String>,
    /// Present only for teachers and for completed quizzes.
    #[serde(default, deserialize_with = "deserialize_answer_key")]
    pub(crate) correct_answer: Option<AnswerLetter>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswerKey {
    List(Vec<String>),
    Single(String),
}

/// The key is stored either as `["B"]` or as `"B"`; only its first letter counts.
fn deserialize_answer_key<'de, D>(deserializer: D) -> Result<Option<AnswerLetter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAnswerKey>::deserialize(deserializer)?;
    let first = match raw {
        Some(RawAnswerKey::List(items)) => items.into_iter().next(),
        Some(RawAnswerKey::Single(value)) => Some(value),
        None => None,
    };

    let Some(first) = first else {
        return Ok(None);
    };
    let Some(ch) = first.trim().chars().next() else {
        return Ok(None);
    };

    AnswerLetter::from_char(ch).map(Some).map_err(D::Error::custom)
}

/// A stored attempt row attached to completed quizzes.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PastAnswerRow {
    pub(crate) answer: Value,
}

impl PastAnswerRow {
    /// `answer` arrives as a list (`["ABD"]`) or as that list JSON-encoded
    /// into a string; the first entry is the submitted code.
    pub(crate) fn answer_code(&self) -> Option<AnswerCode> {
        let first = match &self.answer {
            Value::String(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(items) => items.into_iter().next(),
                Err(_) => Some(raw.clone()),
            },
            Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
            _ => None,
        }?;

        AnswerCode::parse(&first).ok()
    }
}

/// Shape of `GET /classroom/{cid}/quiz/{qid}`: a plain question list while the
/// quiz is open, a `[questions, past_answer_rows]` pair once it is completed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum QuizPayload {
    Reviewed(Vec<Question>, Vec<PastAnswerRow>),
    Open(Vec<Question>),
}

impl QuizPayload {
    pub(crate) fn questions(&self) -> &[Question] {
        match self {
            Self::Reviewed(questions, _) | Self::Open(questions) => questions,
        }
    }

    pub(crate) fn into_questions(self) -> Vec<Question> {
        match self {
            Self::Reviewed(questions, _) | Self::Open(questions) => questions,
        }
    }

    pub(crate) fn past_attempt(&self) -> Option<AnswerCode> {
        match self {
            Self::Reviewed(_, rows) => rows.first().and_then(PastAnswerRow::answer_code),
            Self::Open(_) => None,
        }
    }
}

/// Body of `POST /results/{qid}/answers/{code}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmissionResult {
    #[serde(default)]
    pub(crate) correct_answers: Vec<String>,
    #[serde(default, alias = "answer")]
    pub(crate) user_answers: Vec<String>,
    #[serde(default)]
    pub(crate) score: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn open_quiz_is_a_plain_question_list() {
        let payload: QuizPayload = serde_json::from_value(json!([
            { "question_text": "2 + 2?", "options": ["3", "4", "5", "22"] },
            { "question_text": "H2O is?", "options": ["Water", "Salt"] }
        ]))
        .expect("open payload");

        assert!(matches!(payload, QuizPayload::Open(_)));
        assert_eq!(payload.questions().len(), 2);
        assert!(payload.questions()[0].correct_answer.is_none());
        assert!(payload.past_attempt().is_none());
    }

    #[test]
    fn completed_quiz_carries_key_and_past_attempt() {
        let payload: QuizPayload = serde_json::from_value(json!([
            [
                { "question_text": "2 + 2?", "options": ["3", "4"], "correct_answer": ["B"] },
                { "question_text": "Sky?", "options": ["Blue", "Green"], "correct_answer": "A" }
            ],
            [ { "answer": "[\"BB\"]", "score": 1 } ]
        ]))
        .expect("reviewed payload");

        let questions = payload.questions();
        assert_eq!(questions[0].correct_answer, Some(AnswerLetter::B));
        assert_eq!(questions[1].correct_answer, Some(AnswerLetter::A));
        assert_eq!(payload.past_attempt().map(|code| code.to_string()), Some("BB".to_string()));
    }

    #[test]
    fn past_answer_accepts_plain_list() {
        let row: PastAnswerRow =
            serde_json::from_value(json!({ "answer": ["CAD"] })).expect("row");
        assert_eq!(row.answer_code().map(|code| code.to_string()), Some("CAD".to_string()));
    }

    #[test]
    fn invalid_key_letter_is_rejected() {
        let result = serde_json::from_value::<Question>(json!({
            "question_text": "?", "options": [], "correct_answer": ["Z"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn submission_result_accepts_answer_alias() {
        let result: SubmissionResult = serde_json::from_value(json!({
            "status": "success",
            "score": 2,
            "answer": ["ABB"],
            "correct_answers": ["A", "B", "A"]
        }))
        .expect("result");
        assert_eq!(result.user_answers, vec!["ABB".to_string()]);
        assert_eq!(result.score, Some(2));
    }
}
