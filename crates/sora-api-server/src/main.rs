use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use sora_api_server::config::Settings;
use sora_api_server::routes::build_router;
use sora_api_server::services::{build_generator, ProgressStreamer, StageDelay};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,sora_api_server=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting Sora API Server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let generation = Arc::new(settings.generation.clone());
    let generator = build_generator(&generation);
    let delay = StageDelay::from(generation.as_ref());
    info!(
        "Stage delay {}ms..{}ms",
        generation.min_delay_ms, generation.max_delay_ms
    );

    let streamer = Arc::new(ProgressStreamer::new(generator, delay));

    let app = build_router(streamer, generation);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
