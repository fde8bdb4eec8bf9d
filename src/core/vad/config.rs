//! VAD configuration types

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// VAD backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VadBackend {
    /// WebRTC VAD - lightweight, tuned for telephony-band speech
    #[default]
    WebRtc,
    /// Energy-based - simple RMS threshold detection
    Energy,
}

impl std::fmt::Display for VadBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VadBackend::WebRtc => write!(f, "webrtc"),
            VadBackend::Energy => write!(f, "energy"),
        }
    }
}

impl std::str::FromStr for VadBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webrtc" => Ok(VadBackend::WebRtc),
            "energy" => Ok(VadBackend::Energy),
            _ => anyhow::bail!("unknown VAD backend: {s}. Supported backends: webrtc, energy"),
        }
    }
}

/// Configuration for voice activity classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// Backend to use
    pub backend: VadBackend,

    /// Sample rate for audio processing (Hz)
    /// WebRTC VAD supports 8000, 16000, 32000 and 48000 Hz
    pub sample_rate: u32,

    /// WebRTC aggressiveness mode (0-3)
    /// Higher values = stricter detection, fewer false positives
    pub mode: u8,

    /// RMS amplitude threshold for the energy backend, on the i16 scale
    pub energy_threshold: f32,

    /// Analysis window duration in milliseconds
    /// WebRTC VAD accepts 10, 20 or 30 ms windows
    pub frame_duration_ms: u32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            backend: VadBackend::WebRtc,
            sample_rate: 16000,
            mode: 3, // VeryAggressive, fewest false positives
            energy_threshold: 500.0,
            frame_duration_ms: 30,
        }
    }
}

impl VadConfig {
    /// Window size in samples.
    pub fn frame_samples(&self) -> usize {
        (self.sample_rate as usize / 1000) * self.frame_duration_ms as usize
    }

    /// Window size in bytes of 16-bit PCM.
    pub fn frame_bytes(&self) -> usize {
        self.frame_samples() * 2
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.sample_rate, 8000 | 16000 | 32000 | 48000) {
            anyhow::bail!(
                "VAD sample_rate must be 8000, 16000, 32000 or 48000 Hz, got {}",
                self.sample_rate
            );
        }
        if self.mode > 3 {
            anyhow::bail!("VAD mode must be 0-3, got {}", self.mode);
        }
        if !matches!(self.frame_duration_ms, 10 | 20 | 30) {
            anyhow::bail!(
                "VAD frame_duration_ms must be 10, 20 or 30, got {}",
                self.frame_duration_ms
            );
        }
        if self.energy_threshold < 0.0 {
            anyhow::bail!("VAD energy_threshold must be non-negative");
        }
        Ok(())
    }
}
