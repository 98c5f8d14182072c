use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::api::client::ApiClient;
use crate::services::forms::{self, FormErrors};
use crate::services::Refresh;

pub(crate) const MAX_QUESTIONS: u32 = 50;
const MAX_NAME_CHARS: usize = 100;

/// Quiz source document picked by the teacher. Only the name shows up when a
/// validation error echoes the value back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Upload {
    pub(crate) filename: String,
    #[serde(skip)]
    pub(crate) bytes: Vec<u8>,
}

impl Upload {
    pub(crate) async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { filename, bytes })
    }

    pub(crate) fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Validated body of `POST /generate-quiz`.
#[derive(Debug, Clone, Validate)]
pub(crate) struct QuizCreate {
    #[validate(custom(function = "validate_quiz_name"))]
    pub(crate) name: String,
    #[validate(custom(function = "validate_upload_present"))]
    pub(crate) file: Upload,
    #[validate(range(min = 1, max = 50, message = "Number of questions must be between 1 and 50"))]
    pub(crate) num_questions: u32,
    #[validate(range(max = 50, message = "MCQ count cannot exceed total number of questions"))]
    pub(crate) mcq: u32,
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_quiz_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length == 0 {
        return Err(message_error("name_required", "Name is required"));
    }
    if length > MAX_NAME_CHARS {
        return Err(message_error("name_too_long", "Name must be less than 100 characters"));
    }
    Ok(())
}

fn validate_upload_present(file: &Upload) -> Result<(), ValidationError> {
    if file.bytes.is_empty() {
        return Err(message_error("file_required", "File is required"));
    }
    Ok(())
}

/// Editable state of the create-quiz dialog.
#[derive(Debug, Clone)]
pub(crate) struct QuizForm {
    name: String,
    file: Option<Upload>,
    num_questions: u32,
    mcq: u32,
    max_upload_mb: u64,
    errors: FormErrors,
}

impl QuizForm {
    pub(crate) fn new(max_upload_mb: u64) -> Self {
        Self {
            name: String::new(),
            file: None,
            num_questions: 0,
            mcq: 0,
            max_upload_mb,
            errors: FormErrors::default(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn file(&self) -> Option<&Upload> {
        self.file.as_ref()
    }

    pub(crate) fn num_questions(&self) -> u32 {
        self.num_questions
    }

    pub(crate) fn mcq(&self) -> u32 {
        self.mcq
    }

    /// Derived, never edited directly.
    pub(crate) fn frq(&self) -> u32 {
        self.num_questions.saturating_sub(self.mcq)
    }

    pub(crate) fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.errors.clear_field("name");
    }

    pub(crate) fn set_file(&mut self, file: Upload) {
        self.file = Some(file);
        self.errors.clear_field("file");
    }

    /// Lowering the total below the current MCQ count pulls MCQ down with it.
    pub(crate) fn set_num_questions(&mut self, value: u32) {
        self.num_questions = value;
        if self.mcq > value {
            self.mcq = value;
        }
    }

    pub(crate) fn set_mcq(&mut self, value: u32) {
        self.mcq = value;
    }

    pub(crate) fn reset(&mut self) {
        self.name.clear();
        self.file = None;
        self.num_questions = 10;
        self.mcq = 5;
        self.errors = FormErrors::default();
    }

    pub(crate) fn can_submit(&self) -> bool {
        self.file.is_some() && !self.name.is_empty()
    }

    pub(crate) fn validate(&mut self) -> Result<QuizCreate, FormErrors> {
        let candidate = QuizCreate {
            name: self.name.clone(),
            file: self.file.clone().unwrap_or_default(),
            num_questions: self.num_questions,
            mcq: self.mcq,
        };

        let mut errors = forms::check(&candidate).err().unwrap_or_default();

        let max_bytes = self.max_upload_mb.saturating_mul(1024 * 1024);
        if candidate.file.size() > max_bytes {
            errors.add("file", format!("File size must be less than {}MB", self.max_upload_mb));
        }
        if candidate.mcq > candidate.num_questions && errors.field("mcq").is_empty() {
            errors.add("mcq", "MCQ count cannot exceed total number of questions");
        }

        if errors.is_empty() {
            self.errors = FormErrors::default();
            Ok(candidate)
        } else {
            self.errors = errors.clone();
            Err(errors)
        }
    }

    /// Validates locally first; nothing is sent if that fails. A backend
    /// rejection is kept as the root error and the entered values stay.
    pub(crate) async fn submit(
        &mut self,
        api: &ApiClient,
        classroom_id: &str,
    ) -> Result<Refresh, FormErrors> {
        let quiz = self.validate()?;

        match api.generate_quiz(classroom_id, &quiz).await {
            Ok(()) => {
                tracing::info!(classroom_id, name = %quiz.name, "Quiz generation requested");
                self.errors = FormErrors::default();
                Ok(Refresh::Classroom(classroom_id.to_string()))
            }
            Err(err) => {
                tracing::warn!(classroom_id, error = %err, "Quiz generation rejected");
                self.errors = FormErrors::rejected(&err);
                Err(self.errors.clone())
            }
        }
    }
}
