// src/main.rs

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use porter_cover::{build_router, config::Config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;
    let state = AppState { pool, gap_detection: config.gap_detection };
    info!(detection = ?config.gap_detection, "gap detection configured");

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "API listening on http://localhost:{}/api/v1", config.port);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
