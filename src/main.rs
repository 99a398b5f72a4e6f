//! Leadwire call-relay service.
//!
//! Main entry point. Loads configuration, emits one-time startup warnings
//! for degraded configuration, and serves the relay endpoints until
//! shutdown.

use anyhow::{Context, Result};
use leadwire_api::{AppState, Config};
use leadwire_crm::CrmClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.rust_log);

    info!("Starting Leadwire call relay");

    // Degraded configuration warns once here instead of failing startup;
    // the affected requests fail individually.
    for warning in config.startup_warnings() {
        warn!("{warning}");
    }

    let crm = CrmClient::new(config.to_crm_config()).context("Failed to build CRM client")?;
    let addr = config.parse_server_addr()?;

    info!(addr = %addr, crm_configured = !config.crm_webhook_url.is_empty(), "Configuration loaded");

    let state = AppState::new(config, crm);
    leadwire_api::start_server(state, addr).await.context("Server failed")?;

    info!("Leadwire shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
///
/// `RUST_LOG` takes precedence; the configured default applies otherwise.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
