mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;
mod router;
mod state;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use crate::{
    config::Config,
    router::build_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log at info unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let address = format!("{}:{}", config.server.host, config.server.port);

    // Users and tasks are read once here and rewritten on every mutation
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind server to {}", address))?;

    tracing::info!("Starting server on {}", address);
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
