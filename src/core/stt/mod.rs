pub mod assemblyai;

// Re-export public types and traits
pub use assemblyai::{AssemblyAiConfig, AssemblyAiStt};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Speech-to-text failure modes.
#[derive(Debug, Error)]
pub enum SttError {
    #[error("transcription provider is not configured ({0} is missing)")]
    NotConfigured(&'static str),

    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcription rejected by provider: {0}")]
    Rejected(String),

    #[error("transcript was empty")]
    EmptyTranscript,

    #[error("transcription timed out after {attempts} polls")]
    Timeout { attempts: u32 },
}

/// Batch speech-to-text capability.
///
/// Callers hand over one complete utterance container and eventually get a
/// transcript or a terminal failure; retry and polling cadence are the
/// provider's own business, bounded by its configuration.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe one complete audio container.
    async fn transcribe(&self, audio: Bytes) -> Result<String, SttError>;
}
