//! skirmish-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket game endpoint and the
//! REST inspection endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use skirmish_gateway::app::build_app;
use skirmish_gateway::app_state::AppState;
use skirmish_gateway::config::{GatewayConfig, LogFormat};
use skirmish_gateway::service::SessionService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|err| anyhow::anyhow!("invalid configuration: {err}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        spectators = config.spectators_enabled,
        validation = %config.move_validation,
        "starting skirmish-gateway"
    );

    // Build service layer
    let session_service = Arc::new(SessionService::in_memory(config.session_policy()));

    // Build router
    let app = build_app(AppState::new(session_service, config.outbox_capacity));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
