//! WebRTC voice activity classification
//!
//! Wraps the WebRTC VAD behind the [`VoiceClassifier`] trait. The detector
//! type owns a raw pointer and is not `Send`, so it lives on a dedicated
//! worker thread; classification requests are relayed over a channel and
//! answered through a oneshot. The worker slices each buffer into whole
//! analysis windows (the VAD only accepts 10/20/30 ms frames) and reports
//! `Voice` as soon as any window is voiced.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::config::VadConfig;
use super::{ClassificationError, VadEvent, VoiceClassifier};

struct ClassifyRequest {
    frame: Vec<u8>,
    sample_rate: u32,
    reply: oneshot::Sender<Result<VadEvent, ClassificationError>>,
}

/// WebRTC VAD classifier backed by a dedicated worker thread.
///
/// The worker exits when the classifier (and with it the request channel)
/// is dropped.
pub struct WebRtcClassifier {
    requests: mpsc::UnboundedSender<ClassifyRequest>,
}

impl WebRtcClassifier {
    /// Create a new classifier and spawn its worker thread.
    pub fn new(config: VadConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let (requests, receiver) = mpsc::unbounded_channel();
        std::thread::Builder::new()
            .name("webrtc-vad".to_string())
            .spawn(move || run_worker(config, receiver))?;

        Ok(Self { requests })
    }
}

#[async_trait]
impl VoiceClassifier for WebRtcClassifier {
    async fn classify(
        &self,
        frame: &[u8],
        sample_rate: u32,
    ) -> Result<VadEvent, ClassificationError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(ClassifyRequest {
                frame: frame.to_vec(),
                sample_rate,
                reply,
            })
            .map_err(|_| ClassificationError::Backend("VAD worker thread is gone".to_string()))?;

        response
            .await
            .map_err(|_| ClassificationError::Backend("VAD worker dropped the request".to_string()))?
    }
}

fn run_worker(config: VadConfig, mut receiver: mpsc::UnboundedReceiver<ClassifyRequest>) {
    let mut vad = Vad::new_with_rate_and_mode(to_vad_rate(config.sample_rate), to_vad_mode(config.mode));
    debug!(
        sample_rate = config.sample_rate,
        mode = config.mode,
        "WebRTC VAD worker started"
    );

    while let Some(request) = receiver.blocking_recv() {
        let result = classify_buffer(&mut vad, &config, &request.frame, request.sample_rate);
        // A dropped waiter just means the caller went away mid-classification.
        let _ = request.reply.send(result);
    }

    debug!("WebRTC VAD worker stopped");
}

fn classify_buffer(
    vad: &mut Vad,
    config: &VadConfig,
    frame: &[u8],
    sample_rate: u32,
) -> Result<VadEvent, ClassificationError> {
    if frame.is_empty() {
        return Err(ClassificationError::EmptyFrame);
    }
    if frame.len() % 2 != 0 {
        return Err(ClassificationError::UnalignedFrame(frame.len()));
    }
    if sample_rate != config.sample_rate {
        return Err(ClassificationError::SampleRateMismatch {
            expected: config.sample_rate,
            got: sample_rate,
        });
    }

    let window_bytes = config.frame_bytes();
    if frame.len() < window_bytes {
        return Err(ClassificationError::FrameTooShort(config.frame_duration_ms));
    }

    // A trailing partial window is dropped; it is shorter than the codec's
    // analysis unit and the next chunk supplies fresh audio anyway.
    for window in frame.chunks_exact(window_bytes) {
        let samples: Vec<i16> = window
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let voiced = vad.is_voice_segment(&samples).map_err(|_| {
            ClassificationError::Backend("WebRTC VAD rejected the analysis window".to_string())
        })?;

        if voiced {
            return Ok(VadEvent::Voice);
        }
    }

    Ok(VadEvent::Silence)
}

fn to_vad_mode(mode: u8) -> VadMode {
    match mode {
        0 => VadMode::Quality,
        1 => VadMode::LowBitrate,
        2 => VadMode::Aggressive,
        _ => VadMode::VeryAggressive,
    }
}

fn to_vad_rate(sample_rate: u32) -> SampleRate {
    match sample_rate {
        8000 => SampleRate::Rate8kHz,
        32000 => SampleRate::Rate32kHz,
        48000 => SampleRate::Rate48kHz,
        _ => SampleRate::Rate16kHz,
    }
}
