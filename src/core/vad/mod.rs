//! Voice Activity Detection (VAD) module
//!
//! Acoustic speech/silence classification for the streaming pipeline. The
//! classifier is a polymorphic capability: given a buffer of whole 16-bit
//! samples and its sample rate, it answers `Voice` or `Silence`, or fails
//! with a classification error for a malformed buffer. A failed
//! classification never aborts a stream; callers log it, skip the frame and
//! carry on with prior state unchanged.
//!
//! Two backends are provided:
//!
//! - [`WebRtcClassifier`] (default) wraps the WebRTC VAD. The detector type
//!   is not `Send`, so it lives on a dedicated worker thread and requests
//!   are relayed over a channel.
//! - [`EnergyClassifier`] is a simple RMS threshold detector. It is fully
//!   deterministic on synthetic audio, which makes it the backend of choice
//!   for end-to-end tests.

pub mod config;
mod energy;
pub mod verify;
mod webrtc;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub use config::{VadBackend, VadConfig};
pub use energy::EnergyClassifier;
pub use verify::contains_speech;
pub use webrtc::WebRtcClassifier;

/// Outcome of classifying one audio frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    /// The frame contains speech.
    Voice,
    /// The frame is silence or non-speech noise.
    Silence,
}

/// Per-frame classification failure.
///
/// These are recoverable: the offending frame is treated as inconclusive
/// and skipped.
#[derive(Debug, Clone, Error)]
pub enum ClassificationError {
    #[error("audio frame is empty")]
    EmptyFrame,

    #[error("frame length {0} is not a whole number of 16-bit samples")]
    UnalignedFrame(usize),

    #[error("frame is shorter than one {0}ms analysis window")]
    FrameTooShort(u32),

    #[error("sample rate {got} does not match classifier rate {expected}")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("classifier backend unavailable: {0}")]
    Backend(String),
}

/// Trait for voice activity classification backends.
#[async_trait]
pub trait VoiceClassifier: Send + Sync {
    /// Classify a buffer of whole 16-bit little-endian samples.
    async fn classify(&self, frame: &[u8], sample_rate: u32)
    -> Result<VadEvent, ClassificationError>;
}

/// Create a classifier for the configured backend.
pub fn create_classifier(config: &VadConfig) -> Result<Arc<dyn VoiceClassifier>> {
    config.validate()?;
    let classifier: Arc<dyn VoiceClassifier> = match config.backend {
        VadBackend::WebRtc => Arc::new(WebRtcClassifier::new(config.clone())?),
        VadBackend::Energy => Arc::new(EnergyClassifier::new(config.clone())),
    };
    Ok(classifier)
}
