use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use parent_ai_tutor::{config::Config, routes, services::tutor::Tutor, state::AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let tutor = Tutor::from_config(&config).context("failed to build completion client")?;
    if !tutor.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set. Chat requests will return a fallback reply.");
    }

    let state = Arc::new(AppState::new(tutor));
    let app = routes::create_router().with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("parent AI tutor running at http://localhost:{}", config.port);
    axum::serve(listener, app).await?;
    Ok(())
}
