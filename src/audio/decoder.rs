//! Audio decoding to canonical PCM.
//!
//! Decoding normalizes every input to 16kHz mono 16-bit samples so that
//! window boundaries can be computed exactly from seconds alone.

use crate::defaults::SAMPLE_RATE;
use crate::error::{LingscribeError, Result};
use std::io::Cursor;

/// A recording decoded to canonical PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Sample rate of `samples`, always the canonical rate after decode.
    pub sample_rate: u32,
    /// Mono 16-bit PCM samples.
    pub samples: Vec<i16>,
}

impl DecodedAudio {
    /// Total duration of the recording in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Trait for decoding a raw audio byte stream.
///
/// This trait allows swapping implementations (real container decode vs mock).
/// A decode failure is the one job-level fatal error: without decoded audio
/// no chunk can be produced.
pub trait AudioDecoder: Send + Sync {
    /// Decode raw bytes into canonical PCM.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio>;
}

/// WAV decoder with stereo downmix and resampling to the canonical rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio> {
        let mut reader =
            hound::WavReader::new(Cursor::new(bytes)).map_err(|e| LingscribeError::AudioDecode {
                message: format!("failed to parse WAV data: {e}"),
            })?;

        let spec = reader.spec();
        let raw: Vec<i16> = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LingscribeError::AudioDecode {
                message: format!("failed to read WAV samples: {e}"),
            })?;

        let mono = match spec.channels {
            1 => raw,
            2 => raw
                .chunks_exact(2)
                .map(|pair| {
                    let left = pair[0] as i32;
                    let right = pair[1] as i32;
                    ((left + right) / 2) as i16
                })
                .collect(),
            n => {
                return Err(LingscribeError::AudioDecode {
                    message: format!("unsupported channel count: {n}"),
                });
            }
        };

        let samples = if spec.sample_rate == SAMPLE_RATE {
            mono
        } else {
            resample(&mono, spec.sample_rate, SAMPLE_RATE)
        };

        Ok(DecodedAudio {
            sample_rate: SAMPLE_RATE,
            samples,
        })
    }
}

/// Linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

/// Mock decoder for testing.
#[derive(Debug, Clone)]
pub struct MockDecoder {
    samples: Vec<i16>,
    should_fail: bool,
    error_message: String,
}

impl MockDecoder {
    /// Create a mock that decodes any input to one second of silence.
    pub fn new() -> Self {
        Self {
            samples: vec![0i16; SAMPLE_RATE as usize],
            should_fail: false,
            error_message: "mock decode error".to_string(),
        }
    }

    /// Configure the mock to produce a recording of the given duration.
    pub fn with_duration_seconds(mut self, seconds: f64) -> Self {
        self.samples = vec![0i16; (seconds * SAMPLE_RATE as f64).round() as usize];
        self
    }

    /// Configure the mock to produce specific samples.
    pub fn with_samples(mut self, samples: Vec<i16>) -> Self {
        self.samples = samples;
        self
    }

    /// Configure the mock to fail on decode.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDecoder for MockDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<DecodedAudio> {
        if self.should_fail {
            Err(LingscribeError::AudioDecode {
                message: self.error_message.clone(),
            })
        } else {
            Ok(DecodedAudio {
                sample_rate: SAMPLE_RATE,
                samples: self.samples.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    fn mono_spec(sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_decodes_canonical_mono_unchanged() {
        let samples: Vec<i16> = (0..1000).map(|i| i as i16).collect();
        let bytes = wav_bytes(mono_spec(SAMPLE_RATE), &samples);

        let decoded = WavDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, SAMPLE_RATE);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn test_downmixes_stereo() {
        let spec = hound::WavSpec {
            channels: 2,
            ..mono_spec(SAMPLE_RATE)
        };
        // Interleaved L/R pairs: (100, 300) and (-50, 50).
        let bytes = wav_bytes(spec, &[100, 300, -50, 50]);

        let decoded = WavDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded.samples, vec![200, 0]);
    }

    #[test]
    fn test_resamples_to_canonical_rate() {
        let samples = vec![1000i16; 8000];
        let bytes = wav_bytes(mono_spec(8000), &samples);

        let decoded = WavDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, SAMPLE_RATE);
        // 1s at 8kHz becomes 1s at 16kHz.
        assert_eq!(decoded.samples.len(), 16000);
        assert!((decoded.duration_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let result = WavDecoder.decode(b"definitely not audio");
        assert!(matches!(result, Err(LingscribeError::AudioDecode { .. })));
    }

    #[test]
    fn test_duration_from_sample_count() {
        let audio = DecodedAudio {
            sample_rate: SAMPLE_RATE,
            samples: vec![0i16; SAMPLE_RATE as usize * 3],
        };
        assert_eq!(audio.duration_seconds(), 3.0);
    }

    #[test]
    fn test_mock_decoder_duration() {
        let audio = MockDecoder::new()
            .with_duration_seconds(400.0)
            .decode(&[])
            .unwrap();
        assert!((audio.duration_seconds() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_mock_decoder_failure() {
        let result = MockDecoder::new()
            .with_failure()
            .with_error_message("corrupt input")
            .decode(&[]);
        match result {
            Err(LingscribeError::AudioDecode { message }) => assert_eq!(message, "corrupt input"),
            other => panic!("expected AudioDecode error, got {:?}", other),
        }
    }

    #[test]
    fn test_resample_preserves_constant_signal() {
        let samples = vec![500i16; 4000];
        let out = resample(&samples, 8000, 16000);
        assert!(out.iter().all(|&s| s == 500));
    }
}
