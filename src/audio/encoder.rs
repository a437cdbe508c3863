//! Window encoding for oracle transmission.
//!
//! Windows are shipped as 16kHz mono 16-bit PCM WAV, so one second of
//! payload is exactly one second of time and chunk-relative timestamps from
//! the oracle can be trusted to the sample (no variable-bitrate drift).

use crate::audio::decoder::DecodedAudio;
use crate::defaults;
use crate::error::{LingscribeError, Result};
use std::io::Cursor;

/// A window of audio encoded for transmission to the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedChunk {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Trait for encoding a window of decoded audio into a transmittable blob.
pub trait AudioEncoder: Send + Sync {
    /// Encode the window `[start_seconds, start_seconds + duration_seconds)`.
    ///
    /// The range is clamped to the recording; a window that begins past the
    /// end of the audio encodes as an empty payload.
    fn encode_window(
        &self,
        audio: &DecodedAudio,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> Result<EncodedChunk>;
}

/// Canonical WAV window encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder;

impl AudioEncoder for WavEncoder {
    fn encode_window(
        &self,
        audio: &DecodedAudio,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> Result<EncodedChunk> {
        let rate = audio.sample_rate as f64;
        let first = ((start_seconds * rate).round() as usize).min(audio.samples.len());
        let count = (duration_seconds * rate).round() as usize;
        let end = (first + count).min(audio.samples.len());

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).map_err(|e| {
                LingscribeError::AudioEncode {
                    message: format!("failed to start WAV writer: {e}"),
                }
            })?;
            for &sample in &audio.samples[first..end] {
                writer
                    .write_sample(sample)
                    .map_err(|e| LingscribeError::AudioEncode {
                        message: format!("failed to write WAV sample: {e}"),
                    })?;
            }
            writer.finalize().map_err(|e| LingscribeError::AudioEncode {
                message: format!("failed to finalize WAV data: {e}"),
            })?;
        }

        Ok(EncodedChunk {
            bytes,
            mime_type: defaults::WAV_MIME_TYPE.to_string(),
        })
    }
}

/// Mock encoder for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    should_fail: bool,
}

impl MockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on encode.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl AudioEncoder for MockEncoder {
    fn encode_window(
        &self,
        _audio: &DecodedAudio,
        start_seconds: f64,
        duration_seconds: f64,
    ) -> Result<EncodedChunk> {
        if self.should_fail {
            return Err(LingscribeError::AudioEncode {
                message: "mock encode error".to_string(),
            });
        }
        // Encode the requested range into the payload so tests can assert
        // which window reached the oracle.
        Ok(EncodedChunk {
            bytes: format!("{start_seconds}+{duration_seconds}").into_bytes(),
            mime_type: "audio/mock".to_string(),
        })
    }
}
