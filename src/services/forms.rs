use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors};

use crate::api::errors::ClientError;

/// Per-field messages plus one root-level message for server rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    root: Option<String>,
}

impl FormErrors {
    pub(crate) fn from_validation(errors: &ValidationErrors) -> Self {
        let mut collected = Self::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                collected.add(&field.to_string(), message);
            }
        }
        collected
    }

    pub(crate) fn rejected(error: &ClientError) -> Self {
        Self { fields: BTreeMap::new(), root: Some(error.user_message()) }
    }

    pub(crate) fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(message.into());
    }

    pub(crate) fn set_root(&mut self, message: impl Into<String>) {
        self.root = Some(message.into());
    }

    pub(crate) fn clear_field(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub(crate) fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub(crate) fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.root.is_none()
    }
}

/// Runs the derived schema checks; nothing is sent when this fails.
pub(crate) fn check<T: Validate>(value: &T) -> Result<(), FormErrors> {
    value.validate().map_err(|errors| {
        let collected = FormErrors::from_validation(&errors);
        tracing::debug!(
            fields = ?collected.fields.keys().collect::<Vec<_>>(),
            "Form rejected locally"
        );
        collected
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::classroom::ClassroomCreate;
    use reqwest::StatusCode;

    #[test]
    fn validation_messages_are_grouped_by_field() {
        let errors = check(&ClassroomCreate { name: "ab".to_string() }).unwrap_err();
        assert_eq!(errors.field("name"), ["Name must be at least 4 characters.".to_string()]);
        assert!(errors.root().is_none());
        assert!(errors.field("missing").is_empty());
    }

    #[test]
    fn rejection_fills_root_only() {
        let error = ClientError::Http {
            status: StatusCode::BAD_REQUEST,
            detail: "You are already a member of this classroom".to_string(),
        };
        let errors = FormErrors::rejected(&error);
        assert_eq!(errors.root(), Some("You are already a member of this classroom"));
        assert_eq!(errors.fields().count(), 0);
        assert!(!errors.is_empty());
    }
}
