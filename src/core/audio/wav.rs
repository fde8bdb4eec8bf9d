//! PCM to WAV container encoding
//!
//! The transcription collaborator expects a self-describing audio container,
//! so each utterance buffer is wrapped in a canonical 44-byte RIFF/WAVE
//! header before upload. Encoding is pure and byte-exact for identical
//! inputs: the same PCM always produces the same container.

/// Size of the RIFF/WAVE header produced by [`encode_wav`].
pub const WAV_HEADER_LEN: usize = 44;

/// Bits per sample for 16-bit linear PCM.
const BITS_PER_SAMPLE: u16 = 16;

/// Wrap raw 16-bit little-endian PCM in a minimal WAV container.
///
/// Layout: `RIFF` chunk descriptor, a 16-byte PCM `fmt ` subchunk, and a
/// `data` subchunk holding the payload unmodified. Total output length is
/// always `44 + pcm.len()`.
pub fn encode_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    debug_assert!(pcm.len() % 2 == 0, "PCM payload must be whole samples");

    let byte_rate = sample_rate * u32::from(channels) * 2;
    let block_align = channels * 2;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());

    // RIFF chunk descriptor
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + pcm.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk (16 bytes, audio format 1 = linear PCM)
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    wav.extend_from_slice(pcm);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn header_fields_for_16khz_mono() {
        let pcm = vec![0u8; 3200];
        let wav = encode_wav(&pcm, 16000, 1);

        assert_eq!(wav.len(), WAV_HEADER_LEN + pcm.len());
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + pcm.len() as u32);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 16000);
        assert_eq!(u32_at(&wav, 28), 32000);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), pcm.len() as u32);
    }

    #[test]
    fn payload_is_unmodified() {
        let pcm: Vec<u8> = (0u8..=255).cycle().take(512).collect();
        let wav = encode_wav(&pcm, 16000, 1);
        assert_eq!(&wav[WAV_HEADER_LEN..], &pcm[..]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let pcm = vec![0x12, 0x34, 0x56, 0x78];
        assert_eq!(encode_wav(&pcm, 16000, 1), encode_wav(&pcm, 16000, 1));
    }

    /// Golden bytes for an empty payload: the header alone, fully specified.
    #[test]
    fn golden_header_for_empty_payload() {
        let wav = encode_wav(&[], 16000, 1);
        let expected: [u8; WAV_HEADER_LEN] = [
            b'R', b'I', b'F', b'F', 36, 0, 0, 0, b'W', b'A', b'V', b'E', //
            b'f', b'm', b't', b' ', 16, 0, 0, 0, 1, 0, 1, 0, //
            0x80, 0x3e, 0, 0, // 16000
            0x00, 0x7d, 0, 0, // 32000
            2, 0, 16, 0, //
            b'd', b'a', b't', b'a', 0, 0, 0, 0,
        ];
        assert_eq!(wav, expected);
    }

    #[test]
    fn stereo_rates_scale_with_channel_count() {
        let wav = encode_wav(&[0, 0, 0, 0], 16000, 2);
        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u32_at(&wav, 28), 64000);
        assert_eq!(u16_at(&wav, 32), 4);
    }
}
