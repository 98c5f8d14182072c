use crate::api::client::ApiClient;
use crate::api::errors::ClientError;
use crate::schemas::user::{LoginRequest, SignupRequest, User, UserEnvelope};

impl ApiClient {
    pub(crate) async fn current_user(&self) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self.get_json(&["user"]).await?;
        Ok(envelope.user)
    }

    pub(crate) async fn login(&self, request: &LoginRequest) -> Result<(), ClientError> {
        self.post_json(&["login"], request).await
    }

    pub(crate) async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError> {
        self.post_json(&["signup"], request).await
    }

    pub(crate) async fn logout(&self) -> Result<(), ClientError> {
        self.post_empty(&["logout"]).await
    }
}
