use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::Settings;

/// Logs go to stderr; stdout belongs to the shell. `RUST_LOG` overrides the
/// configured level.
pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    let telemetry = settings.telemetry();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(telemetry.log_level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!telemetry.json && std::io::stderr().is_terminal());

    if telemetry.json {
        builder.json().try_init().map_err(|err| anyhow::anyhow!(err.to_string()))?;
    } else {
        builder.try_init().map_err(|err| anyhow::anyhow!(err.to_string()))?;
    }

    Ok(())
}
