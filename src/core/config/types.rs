use thiserror::Error;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(super) runtime: RuntimeSettings,
    pub(super) backend: BackendSettings,
    pub(super) quiz: QuizSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct BackendSettings {
    pub(crate) base_url: BaseUrl,
    pub(crate) request_timeout_seconds: u64,
    pub(crate) connect_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct QuizSettings {
    pub(crate) max_upload_size_mb: u64,
    pub(crate) stale_after_hours: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Backend root without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BaseUrl(pub(super) String);

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid backend url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("insecure backend url in strict mode: {0}")]
    InsecureBaseUrl(String),
}

impl BaseUrl {
    pub(super) fn parse(value: String) -> Result<Self, ConfigError> {
        let trimmed = value.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidBaseUrl(value));
        }

        let parsed =
            reqwest::Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(value.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(value));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    pub(super) fn is_local_plaintext(&self) -> bool {
        if !self.is_plaintext() {
            return false;
        }
        reqwest::Url::parse(&self.0)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
            .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
    }

    pub(super) fn is_plaintext(&self) -> bool {
        self.0.starts_with("http://")
    }
}
