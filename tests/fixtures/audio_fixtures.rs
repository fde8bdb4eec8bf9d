//! Audio test fixtures
//!
//! Programmatically generated PCM so tests have reproducible inputs with
//! no external file dependencies. All fixtures are 16 kHz, 16-bit signed,
//! mono - the format the streaming endpoint expects.

#![allow(dead_code)]

use std::f32::consts::PI;

/// Standard sample rate for the streaming endpoint (16 kHz).
pub const SAMPLE_RATE: u32 = 16000;

/// Samples in 100 ms at 16 kHz.
pub const MS_100: usize = 1600;

/// Samples in 500 ms at 16 kHz.
pub const MS_500: usize = 8000;

/// Generate silence (pure zeros).
pub fn generate_silence(duration_samples: usize) -> Vec<i16> {
    vec![0i16; duration_samples]
}

/// Generate silence as raw little-endian bytes.
pub fn generate_silence_bytes(duration_samples: usize) -> Vec<u8> {
    samples_to_bytes(&generate_silence(duration_samples))
}

/// Generate a sine wave tone with amplitude in `0.0..=1.0`.
pub fn generate_sine_wave(duration_samples: usize, frequency: f32, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;

    (0..duration_samples)
        .map(|i| ((angular_freq * i as f32).sin() * max_amplitude) as i16)
        .collect()
}

/// Generate a sine wave as raw little-endian bytes.
pub fn generate_sine_wave_bytes(
    duration_samples: usize,
    frequency: f32,
    amplitude: f32,
) -> Vec<u8> {
    samples_to_bytes(&generate_sine_wave(duration_samples, frequency, amplitude))
}

/// Loud "voice-like" fixture: a 440 Hz tone well above any energy threshold.
pub fn generate_voice_bytes(duration_samples: usize) -> Vec<u8> {
    generate_sine_wave_bytes(duration_samples, 440.0, 0.5)
}

/// Convert i16 samples to little-endian bytes.
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|sample| sample.to_le_bytes())
        .collect()
}
