//! Configuration module for the VoxChat gateway
//!
//! Configuration is loaded from the process environment (with `.env`
//! support via `dotenvy` in `main`). Every knob has a default so a bare
//! `ServerConfig::from_env()` always succeeds on a clean environment;
//! collaborator API keys are optional and simply disable their provider
//! when absent.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use zeroize::Zeroize;

use crate::core::segment::SegmenterConfig;
use crate::core::stt::assemblyai::AssemblyAiConfig;
use crate::core::llm::gemini::GeminiConfig;
use crate::core::tts::elevenlabs::ElevenLabsConfig;
use crate::core::vad::VadConfig;

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration
///
/// Contains everything needed to run the gateway: bind address, security
/// knobs, segmentation tuning, and the collaborator endpoints/credentials
/// (LiveKit, AssemblyAI, Gemini, ElevenLabs).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    /// CORS allowed origins (comma-separated list or "*" for all).
    /// `None` means same-origin only.
    pub cors_allowed_origins: Option<String>,

    // Connection limits
    /// Maximum concurrent WebSocket connections; `None` = unlimited.
    pub max_websocket_connections: Option<usize>,
    /// Maximum WebSocket connections per client IP.
    pub max_connections_per_ip: u32,

    // Streaming pipeline tuning
    /// Silence duration that closes an utterance.
    pub silence_threshold_ms: u64,
    /// Voice activity classification settings.
    pub vad: VadConfig,

    // LiveKit settings
    pub livekit_url: Option<String>,
    pub livekit_api_key: Option<String>,
    pub livekit_api_secret: Option<String>,

    // AssemblyAI transcription settings
    pub assemblyai_api_key: Option<String>,
    pub assemblyai_base_url: String,
    pub transcript_poll_interval_ms: u64,
    pub transcript_max_polls: u32,

    // Gemini text generation settings
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,

    // ElevenLabs synthesis settings
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: Some("*".to_string()),
            max_websocket_connections: None,
            max_connections_per_ip: 100,
            silence_threshold_ms: 300,
            vad: VadConfig::default(),
            livekit_url: None,
            livekit_api_key: None,
            livekit_api_secret: None,
            assemblyai_api_key: None,
            assemblyai_base_url: AssemblyAiConfig::default().base_url,
            transcript_poll_interval_ms: 2000,
            transcript_max_polls: 60,
            gemini_api_key: None,
            gemini_base_url: GeminiConfig::default().base_url,
            gemini_model: GeminiConfig::default().model,
            elevenlabs_api_key: None,
            elevenlabs_base_url: ElevenLabsConfig::default().base_url,
            elevenlabs_voice_id: ElevenLabsConfig::default().voice_id,
        }
    }
}

/// Implement Drop to zeroize secret fields when the config goes away.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        if let Some(ref mut secret) = self.livekit_api_key {
            secret.zeroize();
        }
        if let Some(ref mut secret) = self.livekit_api_secret {
            secret.zeroize();
        }
        if let Some(ref mut secret) = self.assemblyai_api_key {
            secret.zeroize();
        }
        if let Some(ref mut secret) = self.gemini_api_key {
            secret.zeroize();
        }
        if let Some(ref mut secret) = self.elevenlabs_api_key {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let vad = VadConfig {
            backend: parse_env("VAD_BACKEND", defaults.vad.backend)?,
            mode: parse_env("VAD_MODE", defaults.vad.mode)?,
            energy_threshold: parse_env("VAD_ENERGY_THRESHOLD", defaults.vad.energy_threshold)?,
            ..defaults.vad.clone()
        };

        let config = Self {
            host: env_or("HOST", &defaults.host),
            port: parse_env("PORT", defaults.port)?,
            cors_allowed_origins: Some(env_or("CORS_ORIGIN", "*")),
            max_websocket_connections: env_opt("MAX_WEBSOCKET_CONNECTIONS")
                .map(|raw| parse_value("MAX_WEBSOCKET_CONNECTIONS", &raw))
                .transpose()?,
            max_connections_per_ip: parse_env(
                "MAX_CONNECTIONS_PER_IP",
                defaults.max_connections_per_ip,
            )?,
            silence_threshold_ms: parse_env("SILENCE_TIMEOUT_MS", defaults.silence_threshold_ms)?,
            vad,
            livekit_url: env_opt("LIVEKIT_URL"),
            livekit_api_key: env_opt("LIVEKIT_API_KEY"),
            livekit_api_secret: env_opt("LIVEKIT_API_SECRET"),
            assemblyai_api_key: env_opt("ASSEMBLY_API_KEY"),
            assemblyai_base_url: env_or("ASSEMBLY_API_URL", &defaults.assemblyai_base_url),
            transcript_poll_interval_ms: parse_env(
                "TRANSCRIPT_POLL_INTERVAL_MS",
                defaults.transcript_poll_interval_ms,
            )?,
            transcript_max_polls: parse_env("TRANSCRIPT_MAX_POLLS", defaults.transcript_max_polls)?,
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_base_url: env_or("GEMINI_API_URL", &defaults.gemini_base_url),
            gemini_model: env_or("GEMINI_MODEL", &defaults.gemini_model),
            elevenlabs_api_key: env_opt("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: env_or("ELEVENLABS_API_URL", &defaults.elevenlabs_base_url),
            elevenlabs_voice_id: env_or("ELEVENLABS_VOICE_ID", &defaults.elevenlabs_voice_id),
        };

        config.validate()?;
        Ok(config)
    }

    /// Socket address string for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Segmenter settings derived from this configuration.
    pub fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            silence_threshold: Duration::from_millis(self.silence_threshold_ms),
            sample_rate: self.vad.sample_rate,
            channels: 1,
        }
    }

    /// AssemblyAI client settings derived from this configuration.
    pub fn assemblyai_config(&self) -> AssemblyAiConfig {
        AssemblyAiConfig {
            api_key: self.assemblyai_api_key.clone(),
            base_url: self.assemblyai_base_url.clone(),
            poll_interval: Duration::from_millis(self.transcript_poll_interval_ms),
            max_poll_attempts: self.transcript_max_polls,
            ..AssemblyAiConfig::default()
        }
    }

    /// Gemini client settings derived from this configuration.
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_base_url.clone(),
            model: self.gemini_model.clone(),
        }
    }

    /// ElevenLabs client settings derived from this configuration.
    pub fn elevenlabs_config(&self) -> ElevenLabsConfig {
        ElevenLabsConfig {
            api_key: self.elevenlabs_api_key.clone(),
            base_url: self.elevenlabs_base_url.clone(),
            voice_id: self.elevenlabs_voice_id.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.vad.validate().map_err(|error| ConfigError::Invalid {
            name: "VAD_*",
            value: format!("{:?}", self.vad),
            reason: error.to_string(),
        })?;
        if self.silence_threshold_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "SILENCE_TIMEOUT_MS",
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|error: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: error.to_string(),
    })
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}
