use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::core::time::deserialize_optional_timestamp;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct User {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) pronouns: Option<String>,
    #[serde(default)]
    pub(crate) image_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) created_at: Option<OffsetDateTime>,
}

impl User {
    pub(crate) fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full.is_empty() {
            return full;
        }
        self.email.clone().unwrap_or_else(|| self.id.clone())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub(crate) user: User,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub(crate) struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 10, message = "Password must be at least 10 characters."))]
    pub(crate) password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub(crate) struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 10, message = "Password must be at least 10 characters."))]
    pub(crate) password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) pronouns: String,
    #[validate(url(message = "Invalid URL"))]
    pub(crate) image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_without_profile_falls_back_to_email() {
        let envelope: UserEnvelope = serde_json::from_value(json!({
            "status": "success",
            "user": {
                "id": "u-1",
                "email": "learner@testit.dev",
                "created_at": "2025-10-01T09:00:00.000000+00:00",
                "first_name": null,
                "last_name": null,
                "image_url": null,
                "pronouns": null
            }
        }))
        .expect("user envelope");

        assert_eq!(envelope.user.display_name(), "learner@testit.dev");
        assert!(envelope.user.created_at.is_some());
    }

    #[test]
    fn login_rejects_short_password_and_bad_email() {
        let request = LoginRequest { email: "nope".to_string(), password: "short".to_string() };
        let errors = request.validate().expect_err("invalid login");
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn signup_requires_url_for_image() {
        let request = SignupRequest {
            email: "teacher@testit.dev".to_string(),
            password: "correct horse battery".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            pronouns: "Ms".to_string(),
            image_url: "not a url".to_string(),
        };
        let errors = request.validate().expect_err("bad url");
        assert!(errors.field_errors().contains_key("image_url"));
    }
}
