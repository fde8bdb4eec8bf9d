//! Per-connection stream session
//!
//! One session is created when a stream socket opens and destroyed when it
//! closes. It owns all per-connection mutable state - the carried byte,
//! the accumulating utterance buffer and the silence timestamp - and is
//! only ever touched by that connection's own message-handling sequence,
//! so it needs no locking. Jobs already queued keep running after the
//! session is destroyed; there is no cancellation link.

use crate::config::ServerConfig;
use crate::core::audio::FrameAssembler;
use crate::core::segment::{Utterance, UtteranceSegmenter};
use crate::core::vad::VadEvent;

/// State owned exclusively by one streaming connection.
pub struct StreamSession {
    assembler: FrameAssembler,
    segmenter: UtteranceSegmenter,
    sample_rate: u32,
    chunks_received: u64,
}

impl StreamSession {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            assembler: FrameAssembler::new(),
            segmenter: UtteranceSegmenter::new(config.segmenter_config()),
            sample_rate: config.vad.sample_rate,
            chunks_received: 0,
        }
    }

    /// Normalize one network chunk into whole-sample bytes.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<u8> {
        self.chunks_received += 1;
        self.assembler.ingest(chunk)
    }

    /// Feed one classified frame to the segmenter.
    pub fn push_classified(&mut self, frame: &[u8], event: VadEvent) -> Option<Utterance> {
        self.segmenter.push(frame, event)
    }

    /// Sample rate this session's audio is declared at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Chunks seen so far, for connection-close logging.
    pub fn chunks_received(&self) -> u64 {
        self.chunks_received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_carries_odd_bytes_across_chunks() {
        let config = ServerConfig::default();
        let mut session = StreamSession::new(&config);

        assert_eq!(session.ingest(&[1, 2, 3]), vec![1, 2]);
        assert_eq!(session.ingest(&[4]), vec![3, 4]);
        assert_eq!(session.chunks_received(), 2);
    }

    #[test]
    fn session_accumulates_through_the_segmenter() {
        let config = ServerConfig::default();
        let mut session = StreamSession::new(&config);

        assert!(session.push_classified(&[1, 1], VadEvent::Voice).is_none());
        assert!(session.push_classified(&[2, 2], VadEvent::Voice).is_none());
    }
}
