use std::sync::Arc;

use anyhow::Context;
use repx_judge::{Judge, VideoJudge};
use repx_server::{AppState, ServerConfig, api};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repx_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RepX judging server...");

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let judge = Judge::new(config.judge.clone()).context("Failed to create judge")?;

    tracing::info!(
        "Judge ready (backend {}, model {}, {} frames)",
        config.judge.backend,
        judge.model_name(),
        config.judge.num_frames
    );

    let addr = config.bind_addr.clone();
    let state = AppState::new(config, Arc::new(judge));
    let judge = Arc::clone(&state.judge);
    state.runner.spawn_retention_sweep(state.config.job_retention);

    // Build router with all API endpoints
    let app = api::create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to start server")?;

    judge.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
