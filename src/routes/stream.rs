//! Streaming audio WebSocket route configuration
//!
//! # Endpoint
//!
//! `GET /ws/audio` - WebSocket upgrade for live PCM streaming
//!
//! # Protocol
//!
//! After the upgrade, the client sends binary frames of raw PCM audio
//! (mono, 16 kHz, 16-bit little-endian, arbitrary chunk boundaries). The
//! server answers with JSON text frames:
//!
//! - `{"event_type": "disappear", "message": ...}` for ephemeral progress
//! - `{"event_type": "final_response", "userText": ..., "aiResponse": ...,
//!   "audio": <base64>, "role": "AI"}` when an utterance completes the
//!   pipeline
//! - `{"error": ..., "details"?: ...}` when an utterance fails

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::stream::stream_handler;
use crate::state::AppState;
use std::sync::Arc;

/// Create the streaming WebSocket router.
pub fn create_stream_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws/audio", get(stream_handler))
        .layer(TraceLayer::new_for_http())
}
