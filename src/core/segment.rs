//! Utterance segmentation
//!
//! Per-connection state machine that turns a stream of classified frames
//! into discrete utterances. Frames accumulate while speech is adjacent;
//! once silence has persisted past the configured threshold the buffered
//! audio is emitted as one utterance and the machine returns to idle.
//!
//! Timing uses a monotonic clock and is evaluated once per incoming chunk,
//! so crossing the threshold always takes at least two chunks: one to start
//! the silence timer and a later one to observe it expired.

use std::time::{Duration, Instant};

use tracing::debug;

use super::vad::VadEvent;

/// One detected spoken segment, bounded by silence on both sides.
///
/// Produced exactly once per boundary and consumed exactly once by the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Contiguous 16-bit little-endian PCM.
    pub pcm: Vec<u8>,
    /// Sample rate of the PCM payload in Hz.
    pub sample_rate: u32,
    /// Channel count of the PCM payload.
    pub channels: u16,
}

impl Utterance {
    /// Audio duration represented by the buffer.
    pub fn duration_ms(&self) -> u64 {
        let bytes_per_ms = (self.sample_rate as u64 / 1000) * self.channels as u64 * 2;
        if bytes_per_ms == 0 {
            return 0;
        }
        self.pcm.len() as u64 / bytes_per_ms
    }
}

/// Segmenter tuning.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// How long silence must persist before an utterance boundary is emitted.
    pub silence_threshold: Duration,
    /// Sample rate stamped onto emitted utterances.
    pub sample_rate: u32,
    /// Channel count stamped onto emitted utterances.
    pub channels: u16,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold: Duration::from_millis(300),
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Per-connection utterance segmenter.
///
/// Owned exclusively by one connection's message-handling sequence; no
/// locking is needed because nothing else ever touches it.
#[derive(Debug)]
pub struct UtteranceSegmenter {
    config: SegmenterConfig,
    buffer: Vec<u8>,
    silence_start: Option<Instant>,
}

impl UtteranceSegmenter {
    /// Create an idle segmenter.
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
            silence_start: None,
        }
    }

    /// Feed one classified frame; returns a completed utterance when the
    /// silence threshold is crossed.
    pub fn push(&mut self, frame: &[u8], event: VadEvent) -> Option<Utterance> {
        self.push_at(frame, event, Instant::now())
    }

    /// Clock-injectable core of [`push`], used directly by tests.
    pub(crate) fn push_at(
        &mut self,
        frame: &[u8],
        event: VadEvent,
        now: Instant,
    ) -> Option<Utterance> {
        // Frames accumulate once an utterance has opened (buffer non-empty)
        // or when this frame itself opens one.
        if !self.buffer.is_empty() || event == VadEvent::Voice {
            self.buffer.extend_from_slice(frame);
        }

        match event {
            VadEvent::Voice => {
                self.silence_start = None;
                None
            }
            VadEvent::Silence => {
                let started = *self.silence_start.get_or_insert(now);
                if now.duration_since(started) > self.config.silence_threshold
                    && !self.buffer.is_empty()
                {
                    self.silence_start = None;
                    let utterance = Utterance {
                        pcm: std::mem::take(&mut self.buffer),
                        sample_rate: self.config.sample_rate,
                        channels: self.config.channels,
                    };
                    debug!(
                        bytes = utterance.pcm.len(),
                        duration_ms = utterance.duration_ms(),
                        "utterance boundary"
                    );
                    Some(utterance)
                } else {
                    None
                }
            }
        }
    }

    /// Whether speech audio is currently being accumulated.
    pub fn is_accumulating(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Bytes buffered for the utterance in progress.
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }
}
