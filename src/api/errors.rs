use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub(crate) const GENERIC_ERROR_MESSAGE: &str =
    "An internal server error has occurred, please try again";

#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned {status}: {detail}")]
    Http { status: StatusCode, detail: String },
    #[error("backend returned {status} without a readable error body")]
    HttpUnparseable { status: StatusCode },
    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("{0}")]
    Invalid(String),
}

/// How a failure should be handled by whoever shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorClass {
    Unauthenticated,
    Forbidden,
    Server,
    Transport,
    Invalid,
}

impl ClientError {
    pub(crate) fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } | Self::HttpUnparseable { status } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Decode { .. } | Self::Invalid(_) => None,
        }
    }

    pub(crate) fn class(&self) -> ErrorClass {
        match self {
            Self::Invalid(_) => ErrorClass::Invalid,
            Self::Transport { .. } => ErrorClass::Transport,
            _ => match self.status() {
                Some(StatusCode::UNAUTHORIZED) => ErrorClass::Unauthenticated,
                Some(StatusCode::FORBIDDEN) => ErrorClass::Forbidden,
                _ => ErrorClass::Server,
            },
        }
    }

    /// Text for the single root-level error line of a form or dialog.
    pub(crate) fn user_message(&self) -> String {
        match self {
            Self::Http { detail, .. } => detail.clone(),
            Self::Invalid(message) => message.clone(),
            Self::Transport { .. } | Self::HttpUnparseable { .. } | Self::Decode { .. } => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Strings are shown verbatim, validation lists are joined by their `msg`,
/// anything else is shown as compact JSON.
pub(crate) fn detail_message(detail: &Value) -> String {
    match detail {
        Value::String(text) => text.clone(),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| item.get("message").and_then(Value::as_str))
                })
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() {
                detail.to_string()
            } else {
                joined
            }
        }
        Value::Null => GENERIC_ERROR_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
