//! Utterance speech verification
//!
//! Before an utterance is committed to the (expensive) transcription
//! pipeline, its buffer is re-scanned in fixed non-overlapping windows to
//! confirm it actually contains speech. The scan short-circuits on the
//! first voiced window; a buffer shorter than one window can never verify.

use tracing::warn;

use super::{VadEvent, VoiceClassifier};

/// Returns `true` if at least one analysis window of `buffer` classifies as
/// voice.
///
/// Windows that fail to classify are logged and treated as non-voice; they
/// never abort the scan.
pub async fn contains_speech(
    classifier: &dyn VoiceClassifier,
    buffer: &[u8],
    sample_rate: u32,
    frame_duration_ms: u32,
) -> bool {
    let window_bytes = (sample_rate as usize / 1000) * frame_duration_ms as usize * 2;
    if window_bytes == 0 || buffer.len() < window_bytes {
        return false;
    }

    for window in buffer.chunks_exact(window_bytes) {
        match classifier.classify(window, sample_rate).await {
            Ok(VadEvent::Voice) => return true,
            Ok(VadEvent::Silence) => {}
            Err(error) => {
                warn!(%error, "speech verification window failed to classify, treating as non-voice");
            }
        }
    }

    false
}
