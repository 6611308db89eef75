//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! This binary reads `CommandEnvelope` messages as newline-delimited JSON
//! from stdin, dispatches them through the host command channel, and writes
//! `ResponseEnvelope` messages to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use design_scout::host::stdio::run_stdio_bridge;
use design_scout::{DesignQueryHandler, ScoutConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("design-scout-host starting");

    let config = ScoutConfig::load().map_err(|e| {
        tracing::error!(error = %e, "failed to load config");
        anyhow::anyhow!("design-scout-host config: {e}")
    })?;
    let handler = DesignQueryHandler::new(&config.search)?;

    run_stdio_bridge(handler, config.limits)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "design-scout-host exited with error");
            anyhow::anyhow!("design-scout-host failed: {e}")
        })?;

    tracing::info!("design-scout-host shut down cleanly");
    Ok(())
}
