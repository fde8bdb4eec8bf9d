//! ElevenLabs synthesis client

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use super::config::ElevenLabsConfig;
use crate::core::tts::{TextToSpeech, TtsError};

/// ElevenLabs-backed speech synthesis.
pub struct ElevenLabsTts {
    config: ElevenLabsConfig,
    http: reqwest::Client,
}

impl ElevenLabsTts {
    /// Create a client with its own connection pool.
    pub fn new(config: ElevenLabsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_client(config: ElevenLabsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn speech_url(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.config.base_url, self.config.voice_id
        )
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsTts {
    async fn synthesize(&self, text: &str) -> Result<Bytes, TtsError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(TtsError::NotConfigured("ELEVENLABS_API_KEY"))?;

        let audio = self
            .http
            .post(self.speech_url())
            .header("xi-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        debug!(bytes = audio.len(), "synthesized audio");
        Ok(audio)
    }
}
