//! Minimal LiveKit server API client
//!
//! Covers exactly what the room endpoints need: minting HS256 access
//! tokens with a video grant, and creating rooms through the RoomService
//! twirp REST surface. The heavyweight official SDK would pull in a gRPC
//! stack this gateway has no other use for.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveKitError {
    #[error("LiveKit is not configured (LIVEKIT_URL / LIVEKIT_API_KEY / LIVEKIT_API_SECRET)")]
    NotConfigured,

    #[error("failed to sign access token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("room service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Video grant embedded in a LiveKit access token.
#[derive(Debug, Default, Serialize)]
pub struct VideoGrant {
    #[serde(rename = "roomCreate", skip_serializing_if = "Option::is_none")]
    pub room_create: Option<bool>,
    #[serde(rename = "roomJoin", skip_serializing_if = "Option::is_none")]
    pub room_join: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    sub: String,
    nbf: u64,
    exp: u64,
    video: VideoGrant,
}

/// LiveKit access-token builder.
pub struct AccessToken {
    api_key: String,
    api_secret: String,
}

impl AccessToken {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Sign a token carrying `grant` for `identity`, valid for `ttl`.
    pub fn sign(
        &self,
        identity: &str,
        grant: VideoGrant,
        ttl: Duration,
    ) -> Result<String, LiveKitError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let claims = Claims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            nbf: now,
            exp: now + ttl.as_secs(),
            video: grant,
        };

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.api_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Token allowing a participant to join `room`.
    pub fn room_join(
        &self,
        identity: &str,
        room: &str,
        ttl: Duration,
    ) -> Result<String, LiveKitError> {
        self.sign(
            identity,
            VideoGrant {
                room_join: Some(true),
                room: Some(room.to_string()),
                ..VideoGrant::default()
            },
            ttl,
        )
    }
}

#[derive(Debug, Serialize)]
struct CreateRoomRequest<'a> {
    name: &'a str,
    #[serde(rename = "emptyTimeout")]
    empty_timeout: u32,
    #[serde(rename = "maxParticipants")]
    max_participants: u32,
}

/// Room metadata returned by the room service.
#[derive(Debug, Deserialize)]
pub struct RoomInfo {
    pub name: String,
    #[serde(default)]
    pub sid: String,
}

/// RoomService twirp client.
pub struct RoomServiceClient {
    http: reqwest::Client,
    base_url: String,
    token: AccessToken,
}

impl RoomServiceClient {
    pub fn new(
        http: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: http_base_url(&url.into()),
            token: AccessToken::new(api_key, api_secret),
        }
    }

    /// Create a room, returning its metadata.
    pub async fn create_room(
        &self,
        name: &str,
        empty_timeout: u32,
        max_participants: u32,
    ) -> Result<RoomInfo, LiveKitError> {
        let admin_token = self.token.sign(
            "voxchat-gateway",
            VideoGrant {
                room_create: Some(true),
                ..VideoGrant::default()
            },
            Duration::from_secs(60),
        )?;

        let room = self
            .http
            .post(format!("{}/twirp/livekit.RoomService/CreateRoom", self.base_url))
            .bearer_auth(admin_token)
            .json(&CreateRoomRequest {
                name,
                empty_timeout,
                max_participants,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(room)
    }
}

/// LiveKit deployments advertise `ws(s)://` URLs; the room service speaks
/// HTTP on the same host.
fn http_base_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        url.trim_end_matches('/').to_string()
    }
}
