use super::parsing::{env_first, env_flag, env_u64, parse_environment};
use super::types::{
    BackendSettings, BaseUrl, ConfigError, QuizSettings, RuntimeSettings, Settings,
    TelemetrySettings,
};

/// A hundred years; anything larger is a typo.
const MAX_STALE_QUIZ_HOURS: u64 = 100 * 365 * 24;

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let environment = parse_environment(env_first(&["TESTIT_ENV", "ENVIRONMENT"]).as_deref());
        let strict_config =
            env_flag("TESTIT_STRICT_CONFIG").unwrap_or(false) || environment.is_production();

        let base_url = BaseUrl::parse(
            env_first(&["TESTIT_API_URL", "NEXT_PUBLIC_URL"])
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
        )?;
        let request_timeout_seconds = env_u64("TESTIT_REQUEST_TIMEOUT_SECONDS", 60)?;
        let connect_timeout_seconds = env_u64("TESTIT_CONNECT_TIMEOUT_SECONDS", 10)?;

        let max_upload_size_mb = env_u64("TESTIT_MAX_UPLOAD_MB", 5)?;
        let stale_after_hours = env_u64("TESTIT_STALE_QUIZ_HOURS", 178)?;

        let log_level =
            env_first(&["LOG_LEVEL"]).unwrap_or_else(|| "info,testit_client=debug".to_string());
        let json = env_flag("LOG_JSON").unwrap_or(false);
        let prometheus_enabled = env_flag("PROMETHEUS_ENABLED").unwrap_or(false);

        let settings = Self {
            runtime: RuntimeSettings { environment, strict_config },
            backend: BackendSettings { base_url, request_timeout_seconds, connect_timeout_seconds },
            quiz: QuizSettings { max_upload_size_mb, stale_after_hours },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn backend(&self) -> &BackendSettings {
        &self.backend
    }

    pub(crate) fn quiz(&self) -> &QuizSettings {
        &self.quiz
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quiz.max_upload_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TESTIT_MAX_UPLOAD_MB",
                value: "0".to_string(),
            });
        }

        if self.backend.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "TESTIT_REQUEST_TIMEOUT_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.quiz.stale_after_hours > MAX_STALE_QUIZ_HOURS {
            return Err(ConfigError::InvalidValue {
                field: "TESTIT_STALE_QUIZ_HOURS",
                value: self.quiz.stale_after_hours.to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.backend.base_url.is_plaintext() && !self.backend.base_url.is_local_plaintext() {
            return Err(ConfigError::InsecureBaseUrl(self.backend.base_url.as_str().to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
impl Settings {
    pub(crate) fn for_base_url(base_url: &str) -> Self {
        Self {
            runtime: RuntimeSettings {
                environment: super::types::Environment::Test,
                strict_config: false,
            },
            backend: BackendSettings {
                base_url: BaseUrl::parse(base_url.to_string()).expect("test base url"),
                request_timeout_seconds: 5,
                connect_timeout_seconds: 2,
            },
            quiz: QuizSettings { max_upload_size_mb: 5, stale_after_hours: 178 },
            telemetry: TelemetrySettings {
                log_level: "debug".to_string(),
                json: false,
                prometheus_enabled: false,
            },
        }
    }
}
