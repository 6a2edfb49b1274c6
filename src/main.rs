//! `tasktrack` binary entry point.
//!
//! Loads settings, installs logging, and serves the REST API until Ctrl-C
//! or SIGTERM.

use tasktrack::{config::Settings, server, telemetry};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = Settings::load()?;
    telemetry::init(&settings.log_filter, settings.log_format)?;

    server::run(settings).await.map_err(|err| {
        tracing::error!(error = %err, "tasktrack stopped");
        err.into()
    })
}
