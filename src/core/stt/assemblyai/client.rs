//! AssemblyAI batch transcription client

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info, warn};

use super::config::AssemblyAiConfig;
use super::messages::{TranscriptRequest, TranscriptResponse, TranscriptStatus, UploadResponse};
use crate::core::stt::{SpeechToText, SttError};

/// Batch transcription over the AssemblyAI v2 REST API.
pub struct AssemblyAiStt {
    config: AssemblyAiConfig,
    http: reqwest::Client,
}

impl AssemblyAiStt {
    /// Create a client with its own connection pool.
    pub fn new(config: AssemblyAiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_client(config: AssemblyAiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn api_key(&self) -> Result<&str, SttError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(SttError::NotConfigured("ASSEMBLY_API_KEY"))
    }

    async fn upload(&self, api_key: &str, audio: Bytes) -> Result<UploadResponse, SttError> {
        let response = self
            .http
            .post(format!("{}/upload", self.config.base_url))
            .header("authorization", api_key)
            .header("content-type", "application/octet-stream")
            .body(audio)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn request_transcript(
        &self,
        api_key: &str,
        audio_url: &str,
    ) -> Result<TranscriptResponse, SttError> {
        let request = TranscriptRequest {
            audio_url,
            language_code: &self.config.language_code,
            punctuate: self.config.punctuate,
            format_text: self.config.format_text,
        };
        let response = self
            .http
            .post(format!("{}/transcript", self.config.base_url))
            .header("authorization", api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn poll_transcript(
        &self,
        api_key: &str,
        transcript_id: &str,
    ) -> Result<TranscriptResponse, SttError> {
        let response = self
            .http
            .get(format!(
                "{}/transcript/{}",
                self.config.base_url, transcript_id
            ))
            .header("authorization", api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    fn finish(transcript: TranscriptResponse) -> Result<String, SttError> {
        match transcript.status {
            TranscriptStatus::Completed => {
                let text = transcript.text.unwrap_or_default();
                if text.trim().is_empty() {
                    Err(SttError::EmptyTranscript)
                } else {
                    Ok(text)
                }
            }
            TranscriptStatus::Error => Err(SttError::Rejected(
                transcript
                    .error
                    .unwrap_or_else(|| "unspecified provider error".to_string()),
            )),
            TranscriptStatus::Queued | TranscriptStatus::Processing => {
                unreachable!("finish called on a non-terminal transcript")
            }
        }
    }
}

#[async_trait]
impl SpeechToText for AssemblyAiStt {
    async fn transcribe(&self, audio: Bytes) -> Result<String, SttError> {
        let api_key = self.api_key()?.to_string();

        debug!(bytes = audio.len(), "uploading audio for transcription");
        let upload = self.upload(&api_key, audio).await?;

        let mut transcript = self.request_transcript(&api_key, &upload.upload_url).await?;
        let transcript_id = transcript.id.clone();

        let mut attempts = 0u32;
        while !matches!(
            transcript.status,
            TranscriptStatus::Completed | TranscriptStatus::Error
        ) {
            if attempts >= self.config.max_poll_attempts {
                warn!(
                    transcript_id,
                    attempts, "transcription poll budget exhausted"
                );
                return Err(SttError::Timeout { attempts });
            }
            tokio::time::sleep(self.config.poll_interval).await;
            transcript = self.poll_transcript(&api_key, &transcript_id).await?;
            attempts += 1;
        }

        let text = Self::finish(transcript)?;
        info!(transcript_id, chars = text.len(), "transcription complete");
        Ok(text)
    }
}
