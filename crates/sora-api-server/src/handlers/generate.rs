use crate::config::GenerationConfig;
use crate::services::ProgressStreamer;
use crate::utils::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};
use sora_proto::{GenerationRequest, ProgressEvent};
use std::sync::Arc;
use tracing::info;

pub async fn generate_handler(
    Extension(streamer): Extension<Arc<ProgressStreamer>>,
    Extension(generation): Extension<Arc<GenerationConfig>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;

    if generation.require_prompt && request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    info!("Generate request: prompt_len={}", request.prompt.len());

    let stream = event_stream(streamer.stream(request.prompt));

    // Sse already sets Content-Type and Cache-Control
    Ok(([(header::CONNECTION, "keep-alive")], Sse::new(stream)))
}

fn event_stream(
    events: impl Stream<Item = ProgressEvent> + Send + 'static,
) -> impl Stream<Item = Result<Event, axum::Error>> + Send + 'static {
    events.map(|event| create_sse_event(&event))
}

// Helper: data-only frame, `data: <json>\n\n`. A payload that fails to
// serialize ends the body instead of sending a frame no client can read.
fn create_sse_event(event: &ProgressEvent) -> Result<Event, axum::Error> {
    Event::default().json_data(event)
}
