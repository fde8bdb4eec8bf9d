//! Application-level error type for HTTP handlers
//!
//! Collaborator and validation failures inside a handler map onto an HTTP
//! status plus the wire error shape `{"error": ..., "details"?: ...}`. No
//! handler error ever terminates the process; the response is the whole
//! blast radius.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::core::stt::SttError;
use crate::core::tts::TtsError;

pub type AppResult<T> = Result<T, AppError>;

/// Handler-facing error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request itself is unusable.
    #[error("{0}")]
    BadRequest(String),

    /// A required collaborator has no credentials.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A collaborator call failed.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// Anything else.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for an upstream failure with diagnostic details.
    pub fn upstream(message: impl Into<String>, details: impl std::fmt::Display) -> Self {
        Self::Upstream {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, None),
            AppError::Upstream { details, .. } => (StatusCode::BAD_GATEWAY, details.clone()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        if status.is_server_error() {
            warn!(status = %status, error = %self, "request failed");
        }

        let mut body = json!({ "error": self.to_string() });
        if let Some(details) = details {
            body["details"] = json!(details);
        }
        (status, Json(body)).into_response()
    }
}

impl From<SttError> for AppError {
    fn from(error: SttError) -> Self {
        match error {
            SttError::NotConfigured(name) => AppError::NotConfigured(name),
            SttError::EmptyTranscript => {
                AppError::BadRequest("Could not transcribe audio".to_string())
            }
            other => AppError::upstream("Transcription failed", other),
        }
    }
}

impl From<TtsError> for AppError {
    fn from(error: TtsError) -> Self {
        match error {
            TtsError::NotConfigured(name) => AppError::NotConfigured(name),
            other => AppError::upstream("Failed to generate audio response", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = AppError::BadRequest("message is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_502() {
        let response = AppError::upstream("Transcription failed", "poll budget").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn empty_transcript_becomes_bad_request() {
        let error: AppError = SttError::EmptyTranscript.into();
        assert!(matches!(error, AppError::BadRequest(_)));
    }

    #[test]
    fn unconfigured_tts_becomes_service_unavailable() {
        let error: AppError = TtsError::NotConfigured("ELEVENLABS_API_KEY").into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
