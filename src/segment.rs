//! Window planning for long recordings.
//!
//! Slices a recording into overlapping windows of fixed length. Consecutive
//! windows start `step = window - overlap` seconds apart, so every instant
//! of the recording is covered by at least one window and window boundaries
//! are always heard with context by the following chunk.

use crate::defaults;
use crate::error::{LingscribeError, Result};
use serde::{Deserialize, Serialize};

/// Windowing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window length in seconds.
    pub window_seconds: f64,
    /// Overlap between consecutive windows in seconds. Must be smaller
    /// than `window_seconds`.
    pub overlap_seconds: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_seconds: defaults::WINDOW_SECONDS,
            overlap_seconds: defaults::OVERLAP_SECONDS,
        }
    }
}

impl ChunkingConfig {
    /// Distance between the start times of consecutive windows.
    pub fn step_seconds(&self) -> f64 {
        self.window_seconds - self.overlap_seconds
    }

    /// Reject configurations that cannot produce a forward-moving plan.
    pub fn validate(&self) -> Result<()> {
        if !self.window_seconds.is_finite() || self.window_seconds <= 0.0 {
            return Err(LingscribeError::ConfigInvalidValue {
                key: "window_seconds".to_string(),
                message: "must be a positive number".to_string(),
            });
        }
        if !self.overlap_seconds.is_finite() || self.overlap_seconds < 0.0 {
            return Err(LingscribeError::ConfigInvalidValue {
                key: "overlap_seconds".to_string(),
                message: "must be zero or positive".to_string(),
            });
        }
        if self.overlap_seconds >= self.window_seconds {
            return Err(LingscribeError::ConfigInvalidValue {
                key: "overlap_seconds".to_string(),
                message: "must be smaller than window_seconds".to_string(),
            });
        }
        Ok(())
    }
}

/// Descriptor for one planned chunk of the recording.
///
/// Immutable once planned; consumed exactly once by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkWindow {
    /// Position in the plan, starting at 0.
    pub index: usize,
    /// Global start of this window in seconds.
    pub start_seconds: f64,
    /// Length of this window in seconds. All windows except possibly the
    /// final one have the full configured window length.
    pub duration_seconds: f64,
    /// Whether the window boundaries are sample-accurate. Size-estimated
    /// plans set this to false, which forces the fuzzy-dedup safety net
    /// during reconciliation.
    pub exact_timing: bool,
    /// Source byte range for size-estimated plans; `None` when the window
    /// is cut from decoded samples.
    pub byte_range: Option<(u64, u64)>,
}

impl ChunkWindow {
    /// Global end of this window in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// Plan windows over a recording of exactly known duration.
///
/// Window starts are `0, step, 2*step, ...` while they fall before the end
/// of the recording; each window covers `[start, min(start + window, total))`.
/// The union of the emitted windows covers `[0, total)` with no gaps.
pub fn plan_by_duration(
    total_duration_seconds: f64,
    config: &ChunkingConfig,
) -> Result<Vec<ChunkWindow>> {
    config.validate()?;

    let mut windows = Vec::new();
    if !(total_duration_seconds > 0.0) {
        return Ok(windows);
    }

    let step = config.step_seconds();
    let mut index = 0usize;
    loop {
        // Multiply rather than accumulate so float error does not drift
        // across a long plan.
        let start = index as f64 * step;
        if start >= total_duration_seconds {
            break;
        }
        let end = (start + config.window_seconds).min(total_duration_seconds);
        windows.push(ChunkWindow {
            index,
            start_seconds: start,
            duration_seconds: end - start,
            exact_timing: true,
            byte_range: None,
        });
        if end >= total_duration_seconds {
            break;
        }
        index += 1;
    }

    Ok(windows)
}

/// Plan windows over a recording known only by byte size.
///
/// Each boundary is placed proportionally: a byte offset maps to
/// `(offset / total_bytes) * probed_duration_seconds`, where the duration
/// comes from a single side decode probe. The mapping assumes a roughly
/// constant bitrate, so timing is approximate and every window is marked
/// `exact_timing: false`.
pub fn plan_by_size(
    total_bytes: u64,
    probed_duration_seconds: f64,
    config: &ChunkingConfig,
) -> Result<Vec<ChunkWindow>> {
    config.validate()?;
    if !probed_duration_seconds.is_finite() || probed_duration_seconds <= 0.0 {
        return Err(LingscribeError::ConfigInvalidValue {
            key: "probed_duration_seconds".to_string(),
            message: "must be a positive number".to_string(),
        });
    }

    let mut windows = Vec::new();
    if total_bytes == 0 {
        return Ok(windows);
    }

    let bytes_per_second = total_bytes as f64 / probed_duration_seconds;
    let step_bytes = ((config.step_seconds() * bytes_per_second).round() as u64).max(1);
    let window_bytes = ((config.window_seconds * bytes_per_second).round() as u64).max(1);

    let seconds_at = |offset: u64| (offset as f64 / total_bytes as f64) * probed_duration_seconds;

    let mut index = 0usize;
    loop {
        let byte_start = index as u64 * step_bytes;
        if byte_start >= total_bytes {
            break;
        }
        let byte_end = (byte_start + window_bytes).min(total_bytes);
        windows.push(ChunkWindow {
            index,
            start_seconds: seconds_at(byte_start),
            duration_seconds: seconds_at(byte_end) - seconds_at(byte_start),
            exact_timing: false,
            byte_range: Some((byte_start, byte_end)),
        });
        if byte_end >= total_bytes {
            break;
        }
        index += 1;
    }

    Ok(windows)
}
