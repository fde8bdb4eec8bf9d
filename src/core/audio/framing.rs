//! PCM byte-stream framing
//!
//! Clients stream raw 16-bit little-endian PCM over the WebSocket with no
//! alignment guarantee: a chunk may end in the middle of a sample. The
//! assembler prepends the byte carried from the previous chunk and withholds
//! a new trailing byte when the combined length is odd, so downstream stages
//! only ever see whole samples.

/// Reassembles arbitrarily-split byte chunks into whole 16-bit sample frames.
///
/// One assembler is owned by each connection session and carries at most a
/// single byte between calls.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    leftover: Option<u8>,
}

impl FrameAssembler {
    /// Create a new assembler with no carried byte.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize one incoming chunk into whole-sample bytes.
    ///
    /// Returns an even-length buffer, possibly empty (a one-byte chunk with
    /// no prior leftover yields nothing to process this call). When the
    /// combined length is odd the final byte is withheld and re-emitted at
    /// the front of the next call's output.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<u8> {
        let mut frames = Vec::with_capacity(chunk.len() + 1);
        if let Some(byte) = self.leftover.take() {
            frames.push(byte);
        }
        frames.extend_from_slice(chunk);
        if frames.len() % 2 != 0 {
            self.leftover = frames.pop();
        }
        frames
    }

    /// The byte currently carried over to the next chunk, if any.
    pub fn leftover(&self) -> Option<u8> {
        self.leftover
    }
}
