//! Energy-based voice activity classification
//!
//! Classifies a frame as voice when its RMS amplitude crosses a fixed
//! threshold. Far less discriminating than the WebRTC backend on real
//! speech, but fully deterministic, which is exactly what integration tests
//! feeding synthetic tones need.

use async_trait::async_trait;

use super::config::VadConfig;
use super::{ClassificationError, VadEvent, VoiceClassifier};

/// RMS threshold classifier.
pub struct EnergyClassifier {
    config: VadConfig,
}

impl EnergyClassifier {
    /// Create a new energy classifier.
    pub fn new(config: VadConfig) -> Self {
        Self { config }
    }

    fn rms(samples: impl Iterator<Item = i16>, count: usize) -> f32 {
        let sum_squares: f64 = samples.map(|s| f64::from(s) * f64::from(s)).sum();
        (sum_squares / count as f64).sqrt() as f32
    }
}

#[async_trait]
impl VoiceClassifier for EnergyClassifier {
    async fn classify(
        &self,
        frame: &[u8],
        sample_rate: u32,
    ) -> Result<VadEvent, ClassificationError> {
        if frame.is_empty() {
            return Err(ClassificationError::EmptyFrame);
        }
        if frame.len() % 2 != 0 {
            return Err(ClassificationError::UnalignedFrame(frame.len()));
        }
        if sample_rate != self.config.sample_rate {
            return Err(ClassificationError::SampleRateMismatch {
                expected: self.config.sample_rate,
                got: sample_rate,
            });
        }

        let samples = frame
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]));
        let rms = Self::rms(samples, frame.len() / 2);

        if rms >= self.config.energy_threshold {
            Ok(VadEvent::Voice)
        } else {
            Ok(VadEvent::Silence)
        }
    }
}
