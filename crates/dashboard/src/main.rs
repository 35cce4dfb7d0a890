//! OptimoRoute Dashboard Service
//!
//! Web dashboard for routes, drivers and orders in OptimoRoute.

use anyhow::{Context, Result};
use optimo_dashboard::{
    client::OptimoClient, config::Config, create_router, settings::SettingsStore, AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optimo_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OptimoRoute Dashboard");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded - listening on {}",
        config.api_address()
    );
    info!("OptimoRoute API: {}", config.base_url);
    if config.api_key.is_empty() {
        warn!("OPTIMOROUTE_API_KEY is not set; calls will be rejected until a key is saved in /settings");
    }

    // Create application state
    let settings = SettingsStore::new(config.api_settings());
    let client = OptimoClient::new(settings, config.timeout_secs)?;
    let app = create_router(AppState::new(client));

    // Start server
    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Dashboard listening on http://{}", config.api_address());
    info!("Health check: http://{}/health", config.api_address());

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
