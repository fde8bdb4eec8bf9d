//! REST API handlers
//!
//! Stateless request/response wrappers around the same collaborators the
//! streaming pipeline uses: a text chat exchange and a buffered one-shot
//! audio exchange. Both return the synthesized reply audio as base64.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// `GET /` - health/welcome endpoint.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "voxchat-gateway",
    }))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/send-message` - text in, reply text plus reply audio out.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<Json<Value>> {
    let message = request
        .message
        .filter(|message| !message.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("message is required".to_string()))?;

    let reply = state.generator.generate(&message).await.trim().to_string();
    let audio = state.synthesizer.synthesize(&reply).await?;

    Ok(Json(json!({
        "response": reply,
        "role": "AI",
        "audio": BASE64.encode(&audio),
    })))
}

/// `POST /api/audio-message` - one uploaded audio file through the full
/// transcribe → generate → synthesize chain.
pub async fn audio_message(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut audio: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::BadRequest(format!("invalid multipart body: {error}")))?
    {
        let name = field.name().map(str::to_string);
        if name.as_deref() == Some("audio") {
            let data = field
                .bytes()
                .await
                .map_err(|error| AppError::BadRequest(format!("invalid audio field: {error}")))?;
            audio = Some(data);
        }
    }

    let audio = audio.ok_or_else(|| AppError::BadRequest("No audio file provided".to_string()))?;
    info!(bytes = audio.len(), "received audio message");

    let transcript = state.transcriber.transcribe(audio).await?;
    let reply = state.generator.generate(&transcript).await.trim().to_string();
    let reply_audio = state.synthesizer.synthesize(&reply).await?;

    Ok(Json(json!({
        "transcribedText": transcript,
        "response": reply,
        "audio": BASE64.encode(&reply_audio),
        "role": "AI",
    })))
}
