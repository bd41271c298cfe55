mod config;
mod error;
mod models;
mod openai;
mod prompts;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::routes::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail until it is");
    }
    tracing::info!(
        "Using API key {} against {} (model {}, strict output: {})",
        config.masked_api_key(),
        config.openai_api_base,
        config.openai_model,
        config.strict_output
    );

    let state = AppState {
        completions: Arc::new(OpenAiClient::new(&config)),
        strict_output: config.strict_output,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting server");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
