use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::config::GenerationConfig;
use crate::handlers;
use crate::services::ProgressStreamer;

pub fn build_router(
    streamer: Arc<ProgressStreamer>,
    generation: Arc<GenerationConfig>,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let api_routes = Router::new()
        .route("/api/generate", post(handlers::generate::generate_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(Extension(streamer))
        .layer(Extension(generation))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}
