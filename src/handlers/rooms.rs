//! Room provisioning handler
//!
//! Creates a LiveKit room for a chat session and mints the access token the
//! browser client joins with. The gateway only provisions; media transport
//! stays between the client and the LiveKit deployment.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::livekit::{AccessToken, RoomServiceClient};
use crate::state::AppState;

/// Rooms older than this with no participants are reclaimed by LiveKit.
const ROOM_EMPTY_TIMEOUT_SECS: u32 = 600;

/// Cap on participants per chat room.
const ROOM_MAX_PARTICIPANTS: u32 = 10;

/// Lifetime of the join token handed to the client.
const TOKEN_TTL: Duration = Duration::from_secs(3600);

/// `POST /api/create-room` - create a room and mint a join token.
pub async fn create_room(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let (Some(url), Some(api_key), Some(api_secret)) = (
        state.config.livekit_url.as_deref(),
        state.config.livekit_api_key.as_deref(),
        state.config.livekit_api_secret.as_deref(),
    ) else {
        return Err(AppError::NotConfigured("LiveKit"));
    };

    let client = RoomServiceClient::new(state.http.clone(), url, api_key, api_secret);
    let room_name = format!("ai-chat-{}", Uuid::new_v4().simple());

    let room = client
        .create_room(&room_name, ROOM_EMPTY_TIMEOUT_SECS, ROOM_MAX_PARTICIPANTS)
        .await
        .map_err(|error| AppError::upstream("Failed to create room", error))?;

    let identity = format!("user-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let token = AccessToken::new(api_key, api_secret)
        .room_join(&identity, &room.name, TOKEN_TTL)
        .map_err(|error| AppError::Internal(error.to_string()))?;

    info!(room = %room.name, %identity, "room created");

    Ok(Json(json!({
        "message": "Room created and token generated.",
        "token": token,
        "roomName": room.name,
    })))
}
