pub(crate) mod api;
pub(crate) mod cli;
pub(crate) mod core;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::api::ApiClient;
use crate::core::{config::Settings, metrics, state::AppState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    metrics::init(&settings)?;

    let api = ApiClient::from_settings(&settings)?;
    tracing::info!(
        base_url = %settings.backend().base_url.as_str(),
        environment = %settings.runtime().environment.as_str(),
        "Testit shell starting"
    );
    let state = AppState::new(settings, api);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut shell = cli::Shell::new(state, stdin, std::io::stdout());
    shell.run().await
}
