use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::errors::{detail_message, ClientError};
use crate::core::config::{BaseUrl, Settings};
use crate::core::metrics;
use crate::schemas::ErrorBody;

/// HTTP access to the Testit backend. The session cookie set by `/login` is
/// kept in the client's cookie store and sent with every later request.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: BaseUrl,
}

impl ApiClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = settings.backend();
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(backend.connect_timeout_seconds))
            .timeout(Duration::from_secs(backend.request_timeout_seconds))
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self { client, base_url: backend.base_url.clone() })
    }

    pub(crate) fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Joins percent-encoded path segments onto the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(self.base_url.as_str())
            .map_err(|err| ClientError::Invalid(format!("invalid backend url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Invalid("backend url cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json<T>(&self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self.send(Method::GET, url.clone(), |builder| builder).await?;
        read_json(&url, response).await
    }

    pub(crate) async fn post_json<B>(&self, segments: &[&str], body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, |builder| builder.json(body)).await?;
        Ok(())
    }

    pub(crate) async fn post_empty(&self, segments: &[&str]) -> Result<(), ClientError> {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, |builder| builder).await?;
        Ok(())
    }

    pub(crate) async fn post_for_json<T>(&self, segments: &[&str]) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self.send(Method::POST, url.clone(), |builder| builder).await?;
        read_json(&url, response).await
    }

    pub(crate) async fn post_multipart(
        &self,
        segments: &[&str],
        form: Form,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, |builder| builder.multipart(form)).await?;
        Ok(())
    }

    /// Sends one request and turns every non-success status into an error.
    async fn send<F>(&self, method: Method, url: Url, build: F) -> Result<Response, ClientError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let request = build(self.client.request(method.clone(), url.clone()));
        let response = request.send().await.map_err(|source| {
            tracing::warn!(%method, url = %url, error = %source, "Backend request failed");
            metrics::record_transport_failure(method.as_str());
            ClientError::Transport { url: url.to_string(), source }
        })?;

        let status = response.status();
        tracing::debug!(%method, url = %url, status = status.as_u16(), "Backend responded");
        metrics::record_backend_response(method.as_str(), status.as_u16());
        if status.is_success() {
            return Ok(response);
        }

        let raw_body = response.text().await.unwrap_or_default();
        let error = match serde_json::from_str::<ErrorBody>(&raw_body) {
            Ok(body) => ClientError::Http { status, detail: detail_message(&body.detail) },
            Err(_) => ClientError::HttpUnparseable { status },
        };
        tracing::warn!(
            %method,
            url = %url,
            status = status.as_u16(),
            error = %error,
            "Backend rejected request"
        );
        Err(error)
    }
}

async fn read_json<T>(url: &Url, response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let body = response.bytes().await.map_err(|source| ClientError::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&body)
        .map_err(|err| ClientError::Decode { url: url.to_string(), message: err.to_string() })
}
