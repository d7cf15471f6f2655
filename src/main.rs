//! live-event-log entry point.
//!
//! Connects to the configured page host and prints the event feed to
//! stdout. Diagnostics go to stderr.

use live_event_log::client::{LiveEventLog, RunOutcome};
use live_event_log::config::ClientConfig;
use live_event_log::render::WriterSurface;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    // Provider for wss:// endpoints
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("crypto provider already installed");
    }

    // Load configuration
    let config = ClientConfig::from_env()?;

    let surface = WriterSurface::new(std::io::stdout(), config.output)
        .raw(config.raw)
        .show_status(config.show_status)
        .element_id(config.element_id.clone());
    let mut client = LiveEventLog::new(&config, surface)?;
    tracing::info!(endpoint = %client.endpoint(), output = %config.output, "client configured");

    let outcome = client
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    if outcome == RunOutcome::Ended && !config.exit_on_close {
        tracing::info!(
            state = %client.state(),
            lines = client.view().len(),
            "event stream ended; press ctrl-c to exit"
        );
        tokio::signal::ctrl_c().await?;
    }

    client.teardown()?;
    Ok(())
}
