use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, rooms};
use crate::state::AppState;
use std::sync::Arc;

/// Create the REST API router.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/create-room", post(rooms::create_room))
        .route("/api/send-message", post(api::send_message))
        .route("/api/audio-message", post(api::audio_message))
        .layer(TraceLayer::new_for_http())
}
