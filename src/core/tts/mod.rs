pub mod elevenlabs;

// Re-export public types and traits
pub use elevenlabs::{ElevenLabsConfig, ElevenLabsTts};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Speech-synthesis failure modes.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech synthesis provider is not configured ({0} is missing)")]
    NotConfigured(&'static str),

    #[error("synthesis request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Text-to-speech capability.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text` into audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Bytes, TtsError>;
}
