use anyhow::Result;
use rootline_ingestion::service::{router, AppState};
use rootline_ingestion::upload::ServiceConfig;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Rootline Ingestion Service v0.1.0");

    let config = ServiceConfig::from_env()?;
    info!(
        "Upload cap: {} bytes per request body",
        config.max_upload_bytes
    );

    let state = AppState::new();
    let app = router(state, config.max_upload_bytes);

    info!("Starting HTTP server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
