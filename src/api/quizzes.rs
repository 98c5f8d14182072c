use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::api::client::ApiClient;
use crate::api::errors::ClientError;
use crate::schemas::quiz::{QuizPayload, SubmissionResult};
use crate::services::answer_code::AnswerCode;
use crate::services::quiz_form::QuizCreate;

/// Quiz endpoints the taking/review flows depend on.
#[async_trait]
pub(crate) trait QuizBackend: Send + Sync {
    async fn quiz(&self, classroom_id: &str, quiz_id: &str) -> Result<QuizPayload, ClientError>;

    async fn submit_answers(
        &self,
        quiz_id: &str,
        code: &AnswerCode,
    ) -> Result<SubmissionResult, ClientError>;
}

impl ApiClient {
    pub(crate) async fn quiz(
        &self,
        classroom_id: &str,
        quiz_id: &str,
    ) -> Result<QuizPayload, ClientError> {
        self.get_json(&["classroom", classroom_id, "quiz", quiz_id]).await
    }

    pub(crate) async fn submit_answers(
        &self,
        quiz_id: &str,
        code: &AnswerCode,
    ) -> Result<SubmissionResult, ClientError> {
        let code = code.to_string();
        self.post_for_json(&["results", quiz_id, "answers", code.as_str()]).await
    }

    /// The backend generates the questions from the uploaded file. Free
    /// response generation is not offered, so `frq` is always sent as 0.
    pub(crate) async fn generate_quiz(
        &self,
        classroom_id: &str,
        quiz: &QuizCreate,
    ) -> Result<(), ClientError> {
        let file = Part::bytes(quiz.file.bytes.clone()).file_name(quiz.file.filename.clone());
        let form = Form::new()
            .text("name", quiz.name.clone())
            .part("file", file)
            .text("num_questions", quiz.num_questions.to_string())
            .text("mcq", quiz.mcq.to_string())
            .text("frq", "0")
            .text("classroom_id", classroom_id.to_string());

        self.post_multipart(&["generate-quiz"], form).await
    }
}

#[async_trait]
impl QuizBackend for ApiClient {
    async fn quiz(&self, classroom_id: &str, quiz_id: &str) -> Result<QuizPayload, ClientError> {
        ApiClient::quiz(self, classroom_id, quiz_id).await
    }

    async fn submit_answers(
        &self,
        quiz_id: &str,
        code: &AnswerCode,
    ) -> Result<SubmissionResult, ClientError> {
        ApiClient::submit_answers(self, quiz_id, code).await
    }
}
