use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::services::ProgressStreamer;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    generator: &'static str,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Reports which generator backend answers requests. An `unavailable`
/// backend is still ready; it answers every request with a failure frame.
pub async fn readiness_check(
    Extension(streamer): Extension<Arc<ProgressStreamer>>,
    Extension(generation): Extension<Arc<GenerationConfig>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            generator: streamer.generator_name(),
            min_delay_ms: generation.min_delay_ms,
            max_delay_ms: generation.max_delay_ms,
        }),
    )
}
