//! ElevenLabs speech synthesis
//!
//! Single-shot HTTP client for the streaming text-to-speech endpoint; the
//! response body is collected into one audio buffer for delivery.

mod config;
mod provider;

pub use config::ElevenLabsConfig;
pub use provider::ElevenLabsTts;
