//! Audio payload helpers for speech and live sessions
//!
//! Audio travels as base64 text inside JSON frames and as raw 16-bit
//! little-endian mono PCM once decoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Sample rate of microphone audio sent to a live session
pub const INPUT_SAMPLE_RATE: u32 = 16_000;

/// Sample rate of audio produced by speech synthesis and live sessions
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// MIME type announced for outgoing live audio chunks
pub fn input_mime_type() -> String {
    format!("audio/pcm;rate={INPUT_SAMPLE_RATE}")
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(data)
}

/// Convert 16-bit LE PCM bytes into samples in `[-1.0, 1.0)`
///
/// A trailing odd byte is ignored.
pub fn pcm16_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

/// Convert float samples into 16-bit LE PCM bytes, clamping out-of-range input
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&sample| {
            let scaled = (sample * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32);
            (scaled as i16).to_le_bytes()
        })
        .collect()
}

/// Playback length of mono 16-bit PCM at the given rate
pub fn pcm16_duration(bytes: usize, sample_rate: u32) -> std::time::Duration {
    let samples = (bytes / 2) as u64;
    std::time::Duration::from_micros(samples * 1_000_000 / sample_rate.max(1) as u64)
}
