//! AssemblyAI REST API message types

use serde::{Deserialize, Serialize};

/// Response to an audio upload.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Opaque URL referencing the uploaded audio.
    pub upload_url: String,
}

/// Body of a transcript creation request.
#[derive(Debug, Serialize)]
pub struct TranscriptRequest<'a> {
    pub audio_url: &'a str,
    pub language_code: &'a str,
    pub punctuate: bool,
    pub format_text: bool,
}

/// Lifecycle state of a transcript job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// Transcript resource as returned by creation and polling.
#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_response_deserializes_completed() {
        let json = r#"{"id": "abc123", "status": "completed", "text": "hello world"}"#;
        let response: TranscriptResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "abc123");
        assert_eq!(response.status, TranscriptStatus::Completed);
        assert_eq!(response.text.as_deref(), Some("hello world"));
        assert!(response.error.is_none());
    }

    #[test]
    fn transcript_response_deserializes_error() {
        let json = r#"{"id": "abc123", "status": "error", "error": "bad audio"}"#;
        let response: TranscriptResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, TranscriptStatus::Error);
        assert_eq!(response.error.as_deref(), Some("bad audio"));
    }

    #[test]
    fn transcript_request_serializes_expected_fields() {
        let request = TranscriptRequest {
            audio_url: "https://cdn.example/upload/1",
            language_code: "en",
            punctuate: true,
            format_text: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["audio_url"], "https://cdn.example/upload/1");
        assert_eq!(value["language_code"], "en");
        assert_eq!(value["punctuate"], true);
        assert_eq!(value["format_text"], true);
    }
}
