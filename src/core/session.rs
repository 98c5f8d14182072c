use crate::api::{ApiClient, ClientError, ErrorClass};
use crate::schemas::user::{LoginRequest, SignupRequest, User};
use crate::services::forms::{self, FormErrors};
use crate::services::Refresh;

/// What the top-level boundary does with an error no page handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BoundaryAction {
    PromptLogin,
    Denied(String),
    RetryBanner(String),
}

pub(crate) fn boundary(error: &ClientError) -> BoundaryAction {
    match error.class() {
        ErrorClass::Unauthenticated => BoundaryAction::PromptLogin,
        ErrorClass::Forbidden => BoundaryAction::Denied(error.user_message()),
        ErrorClass::Server | ErrorClass::Transport | ErrorClass::Invalid => {
            BoundaryAction::RetryBanner(error.user_message())
        }
    }
}

/// Who is signed in. Passed explicitly to whatever needs it; every auth change
/// re-fetches `/user` instead of restarting the shell.
#[derive(Debug, Default)]
pub(crate) struct SessionStore {
    current_user: Option<User>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub(crate) fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// A 401 means signed out, not failure.
    pub(crate) async fn refresh_user(
        &mut self,
        api: &ApiClient,
    ) -> Result<Option<&User>, ClientError> {
        match api.current_user().await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Session user refreshed");
                self.current_user = Some(user);
            }
            Err(err) if err.class() == ErrorClass::Unauthenticated => {
                self.current_user = None;
            }
            Err(err) => return Err(err),
        }
        Ok(self.current_user.as_ref())
    }

    pub(crate) async fn login(
        &mut self,
        api: &ApiClient,
        request: &LoginRequest,
    ) -> Result<Refresh, FormErrors> {
        forms::check(request)?;
        api.login(request).await.map_err(|err| FormErrors::rejected(&err))?;
        self.reload_after_auth(api).await
    }

    pub(crate) async fn signup(
        &mut self,
        api: &ApiClient,
        request: &SignupRequest,
    ) -> Result<Refresh, FormErrors> {
        forms::check(request)?;
        api.signup(request).await.map_err(|err| FormErrors::rejected(&err))?;
        self.reload_after_auth(api).await
    }

    pub(crate) async fn logout(&mut self, api: &ApiClient) -> Result<Refresh, ClientError> {
        api.logout().await?;
        self.current_user = None;
        tracing::info!("Signed out");
        Ok(Refresh::User)
    }

    async fn reload_after_auth(&mut self, api: &ApiClient) -> Result<Refresh, FormErrors> {
        match self.refresh_user(api).await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Signed in");
                Ok(Refresh::User)
            }
            Ok(None) => {
                let mut errors = FormErrors::default();
                errors.set_root("Signed in, but the session was not accepted by the server");
                Err(errors)
            }
            Err(err) => Err(FormErrors::rejected(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::GENERIC_ERROR_MESSAGE;
    use crate::test_support;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn has_session(headers: &HeaderMap) -> bool {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.split(';').any(|pair| pair.trim() == "session=abc123"))
    }

    fn auth_router() -> Router {
        Router::new()
            .route(
                "/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] != "correct horse battery" {
                        let body = Json(json!({ "detail": "Invalid credentials" }));
                        return (StatusCode::UNAUTHORIZED, body).into_response();
                    }
                    (
                        [(header::SET_COOKIE, "session=abc123; Path=/; HttpOnly")],
                        Json(json!({ "status": "success" })),
                    )
                        .into_response()
                }),
            )
            .route(
                "/user",
                get(|headers: HeaderMap| async move {
                    if !has_session(&headers) {
                        let body = Json(json!({ "detail": "Not authenticated" }));
                        return (StatusCode::UNAUTHORIZED, body).into_response();
                    }
                    Json(json!({
                        "status": "success",
                        "user": {
                            "id": "u-1",
                            "email": "learner@testit.dev",
                            "first_name": "Grace"
                        }
                    }))
                    .into_response()
                }),
            )
            .route("/logout", post(|| async { Json(json!({ "status": "success" })) }))
    }

    #[test]
    fn boundary_routes_by_error_class() {
        let unauthorized = ClientError::Http {
            status: StatusCode::UNAUTHORIZED,
            detail: "Not authenticated".into(),
        };
        let forbidden =
            ClientError::Http { status: StatusCode::FORBIDDEN, detail: "Teachers only".into() };
        let server = ClientError::HttpUnparseable { status: StatusCode::BAD_GATEWAY };

        assert_eq!(boundary(&unauthorized), BoundaryAction::PromptLogin);
        assert_eq!(boundary(&forbidden), BoundaryAction::Denied("Teachers only".into()));
        assert_eq!(boundary(&server), BoundaryAction::RetryBanner(GENERIC_ERROR_MESSAGE.into()));
    }

    #[tokio::test]
    async fn login_stores_cookie_and_refreshes_user() {
        let backend = test_support::spawn_backend(auth_router()).await;
        let mut session = SessionStore::new();

        assert!(session.refresh_user(&backend.client).await.expect("refresh").is_none());

        let refresh = session
            .login(
                &backend.client,
                &LoginRequest {
                    email: "learner@testit.dev".into(),
                    password: "correct horse battery".into(),
                },
            )
            .await
            .expect("login");
        assert_eq!(refresh, Refresh::User);
        assert_eq!(session.current_user().map(User::display_name), Some("Grace".to_string()));

        session.logout(&backend.client).await.expect("logout");
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn rejected_login_keeps_session_empty() {
        let backend = test_support::spawn_backend(auth_router()).await;
        let mut session = SessionStore::new();

        let errors = session
            .login(
                &backend.client,
                &LoginRequest {
                    email: "learner@testit.dev".into(),
                    password: "wrong password".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(errors.root(), Some("Invalid credentials"));
        assert!(!session.is_signed_in());

        let errors = session
            .login(
                &backend.client,
                &LoginRequest { email: "nope".into(), password: "short".into() },
            )
            .await
            .unwrap_err();
        assert!(errors.root().is_none());
        assert_eq!(errors.field("password"), ["Password must be at least 10 characters."]);
    }
}
