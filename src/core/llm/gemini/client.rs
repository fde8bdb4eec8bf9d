//! Gemini text-generation client

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use super::config::GeminiConfig;
use super::messages::{GenerateContentRequest, GenerateContentResponse};
use crate::core::llm::{FALLBACK_REPLY, TextGenerator};

/// Instruction wrapped around every user input to keep replies short and
/// conversational.
const PROMPT_PREFIX: &str = "Reply in short to the user: ";

#[derive(Debug, Error)]
enum GenerateError {
    #[error("GEMINI_API_KEY is missing")]
    NotConfigured,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion contained no text")]
    EmptyCompletion,
}

/// Gemini-backed reply generation.
pub struct GeminiGenerator {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a client with its own connection pool.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_client(config: GeminiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    async fn request(&self, input: &str) -> Result<String, GenerateError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerateError::NotConfigured)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateContentRequest::from_text(format!("{PROMPT_PREFIX}{input}"));

        let response: GenerateContentResponse = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .into_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerateError::EmptyCompletion)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, input: &str) -> String {
        match self.request(input).await {
            Ok(reply) => {
                debug!(chars = reply.len(), "generated reply");
                reply
            }
            Err(error) => {
                warn!(%error, "text generation failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
