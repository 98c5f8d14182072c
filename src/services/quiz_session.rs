use thiserror::Error;

use crate::api::errors::ClientError;
use crate::api::quizzes::QuizBackend;
use crate::core::metrics;
use crate::schemas::quiz::{Question, SubmissionResult};
use crate::services::answer_code::{AnswerCode, AnswerCodeError, AnswerLetter};
use crate::services::scoring::{score_submission, ScoreReport};
use crate::services::Refresh;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionPhase {
    Loading,
    InProgress,
    Submitting,
    Succeeded(ScoreReport),
    /// The attempt stays editable so the learner can fix and resubmit.
    Failed(String),
}

impl SessionPhase {
    fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::InProgress => "in_progress",
            Self::Submitting => "submitting",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SessionError {
    #[error("quiz is not accepting answers while {0}")]
    NotEditable(&'static str),
    #[error("question {0} does not exist")]
    UnknownQuestion(usize),
    #[error("question {question} has no option {option}")]
    UnknownOption { question: usize, option: usize },
    #[error("every question needs an answer before submitting")]
    Incomplete,
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error(transparent)]
    Code(#[from] AnswerCodeError),
    #[error("{0}")]
    Rejected(String),
}

/// One learner's attempt at one quiz, held only in memory.
#[derive(Debug, Clone)]
pub(crate) struct QuizSession {
    classroom_id: String,
    quiz_id: String,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    phase: SessionPhase,
}

impl QuizSession {
    pub(crate) fn new(classroom_id: impl Into<String>, quiz_id: impl Into<String>) -> Self {
        Self {
            classroom_id: classroom_id.into(),
            quiz_id: quiz_id.into(),
            questions: Vec::new(),
            answers: Vec::new(),
            phase: SessionPhase::Loading,
        }
    }

    pub(crate) fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub(crate) fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub(crate) fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub(crate) fn error_message(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Fetches the questions; on failure the session stays in `Loading`.
    pub(crate) async fn load<B>(&mut self, backend: &B) -> Result<(), ClientError>
    where
        B: QuizBackend + ?Sized,
    {
        let payload = backend.quiz(&self.classroom_id, &self.quiz_id).await?;
        self.start(payload.into_questions())
            .map_err(|err| ClientError::Invalid(err.to_string()))
    }

    /// Enters `InProgress` with one unanswered slot per question.
    pub(crate) fn start(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::NotEditable(self.phase.name()));
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.phase = SessionPhase::InProgress;
        tracing::debug!(
            quiz_id = %self.quiz_id,
            questions = self.questions.len(),
            "Quiz attempt started"
        );
        Ok(())
    }

    fn is_editable(&self) -> bool {
        matches!(self.phase, SessionPhase::InProgress | SessionPhase::Failed(_))
    }

    /// Overwrites the choice for `question`; picking again replaces it.
    pub(crate) fn select(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        if !self.is_editable() {
            return Err(SessionError::NotEditable(self.phase.name()));
        }
        let Some(entry) = self.questions.get(question) else {
            return Err(SessionError::UnknownQuestion(question));
        };
        if option >= entry.options.len() {
            return Err(SessionError::UnknownOption { question, option });
        }
        AnswerLetter::from_index(option)?;

        self.answers[question] = Some(option);
        Ok(())
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    pub(crate) fn can_submit(&self) -> bool {
        self.is_editable() && self.is_complete()
    }

    pub(crate) fn answer_code(&self) -> Result<AnswerCode, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::Incomplete);
        }
        Ok(AnswerCode::from_indices(self.answers.iter().flatten().copied())?)
    }

    /// Moves to `Submitting` and hands out the code to post. Refused while a
    /// submission is already in flight.
    pub(crate) fn begin_submit(&mut self) -> Result<AnswerCode, SessionError> {
        if self.phase == SessionPhase::Submitting {
            return Err(SessionError::AlreadySubmitting);
        }
        if !self.is_editable() {
            return Err(SessionError::NotEditable(self.phase.name()));
        }
        let code = self.answer_code()?;
        self.phase = SessionPhase::Submitting;
        Ok(code)
    }

    pub(crate) fn complete(&mut self, result: &SubmissionResult) -> Result<Refresh, SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotEditable(self.phase.name()));
        }
        let report = score_submission(result, self.answers.len());
        tracing::info!(
            quiz_id = %self.quiz_id,
            score = report.score,
            total = report.total,
            server_score = ?result.score,
            "Quiz submitted"
        );
        metrics::record_submission("success");
        self.phase = SessionPhase::Succeeded(report);
        Ok(Refresh::Classroom(self.classroom_id.clone()))
    }

    pub(crate) fn fail(&mut self, error: &ClientError) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotEditable(self.phase.name()));
        }
        tracing::warn!(quiz_id = %self.quiz_id, error = %error, "Quiz submission failed");
        metrics::record_submission("failure");
        self.phase = SessionPhase::Failed(error.user_message());
        Ok(())
    }

    /// Posts the attempt once. No retry: a failure leaves the session editable.
    pub(crate) async fn submit<B>(&mut self, backend: &B) -> Result<Refresh, SessionError>
    where
        B: QuizBackend + ?Sized,
    {
        let code = self.begin_submit()?;
        match backend.submit_answers(&self.quiz_id, &code).await {
            Ok(result) => self.complete(&result),
            Err(err) => {
                self.fail(&err)?;
                Err(SessionError::Rejected(err.user_message()))
            }
        }
    }
}
