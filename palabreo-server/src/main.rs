//! Palabreo Server - REST API for works, profiles and reading

use anyhow::{Context, Result};
use palabreo_server::{config::ServerConfig, routes, state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palabreo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = state::AppState::new(&config)
        .await
        .with_context(|| format!("Failed to open storage at {}", config.storage_path.display()))?;

    let app = routes::create_router_with_cors(state, &config.cors_origins);

    tracing::info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
