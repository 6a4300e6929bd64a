//! medassist web server
//!
//! Run with: cargo run -p medassist-web --bin medassist

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medassist_config::Config;
use medassist_web::{router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config = Config::load().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting medassist web server...");

    let state = AppState::from_config(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
