//! Streaming WebSocket message types
//!
//! Wire shapes match the original client protocol exactly: progress
//! notices carry an `event_type` tag, terminal failures are a bare
//! `{error, details?}` object.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::core::pipeline::PipelineEvent;

/// Tagged events sent to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Ephemeral progress notice; clients typically show and fade it.
    Disappear { message: String },

    /// Terminal success for one utterance.
    FinalResponse {
        #[serde(rename = "userText")]
        user_text: String,
        #[serde(rename = "aiResponse")]
        ai_response: String,
        /// Synthesized reply audio, base64-encoded.
        audio: String,
        role: String,
    },
}

/// Terminal failure for one utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Any message the server sends on the stream socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Event(StreamEvent),
    Error(ErrorMessage),
}

/// Routing instruction for the socket sender task.
#[derive(Debug)]
pub enum MessageRoute {
    Outgoing(OutgoingMessage),
    Close,
}

impl From<PipelineEvent> for OutgoingMessage {
    fn from(event: PipelineEvent) -> Self {
        match event {
            PipelineEvent::Status { message } => {
                OutgoingMessage::Event(StreamEvent::Disappear { message })
            }
            PipelineEvent::Completed {
                transcript,
                reply,
                audio,
            } => OutgoingMessage::Event(StreamEvent::FinalResponse {
                user_text: transcript,
                ai_response: reply,
                audio: BASE64.encode(&audio),
                role: "AI".to_string(),
            }),
            PipelineEvent::Failed { error, details } => {
                OutgoingMessage::Error(ErrorMessage { error, details })
            }
        }
    }
}
