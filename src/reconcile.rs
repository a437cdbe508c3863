//! Fusing chunk-local results into one global transcript.
//!
//! Consecutive chunks overlap, so the same utterance can be transcribed
//! twice. One configured policy decides which chunk owns each line, and an
//! optional fuzzy-dedup safety net catches duplicates that survive the
//! policy when chunk timing is not sample-accurate.

use crate::defaults;
use crate::segment::{ChunkWindow, ChunkingConfig};
use crate::transcript::{ChunkResult, TranscriptLine};
use serde::{Deserialize, Serialize};

/// Which chunk owns a line that appears inside an overlap region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcilePolicy {
    /// Each chunk owns exactly the lines whose chunk-relative start falls
    /// in `[0, step)`; the final chunk owns everything up to its own
    /// duration. Exhaustive and non-overlapping by construction; the
    /// overlap region belongs to the later chunk. Requires sample-accurate
    /// chunk timing.
    #[default]
    Tiling,
    /// Every chunk except the first discards lines whose chunk-relative
    /// start falls inside the leading overlap; the previous chunk heard
    /// that audio without a context gap and is assumed to have captured it.
    OverlapDiscard,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconcileConfig {
    pub policy: ReconcilePolicy,
    /// Force the fuzzy-dedup safety net even for sample-accurate plans.
    /// Plans with estimated timing (size-based chunking) get the net
    /// regardless of this flag.
    pub fuzzy_dedup: bool,
    /// Two lines whose global starts differ by less than this are
    /// duplicate candidates.
    pub fuzzy_epsilon_seconds: f64,
    /// Leading English characters compared (case-insensitively) to confirm
    /// a duplicate candidate.
    pub fuzzy_prefix_chars: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::default(),
            fuzzy_dedup: false,
            fuzzy_epsilon_seconds: defaults::FUZZY_EPSILON_SECONDS,
            fuzzy_prefix_chars: defaults::FUZZY_PREFIX_CHARS,
        }
    }
}

/// Merge index-aligned chunk results into global, duplicate-free lines.
///
/// `windows` and `results` are index-aligned; a window whose result slot
/// holds the empty sentinel simply contributes nothing. The output is
/// unsorted; `transcript::sort_transcript` makes the final order.
pub fn merge(
    windows: &[ChunkWindow],
    results: Vec<ChunkResult>,
    chunking: &ChunkingConfig,
    config: &ReconcileConfig,
) -> Vec<TranscriptLine> {
    let fuzzy = config.fuzzy_dedup || windows.iter().any(|w| !w.exact_timing);
    let step = chunking.step_seconds();
    let last_index = windows.len().saturating_sub(1);

    let mut merged: Vec<TranscriptLine> = Vec::new();

    for (window, result) in windows.iter().zip(results) {
        for line in result.transcript {
            if !owns_line(window, &line, step, chunking.overlap_seconds, last_index, config.policy) {
                continue;
            }

            let global = TranscriptLine {
                start_time_in_seconds: window.start_seconds + line.start_time_in_seconds,
                end_time_in_seconds: window.start_seconds + line.end_time_in_seconds,
                ..line
            };

            // Later-arriving duplicates drop; the earlier chunk's line wins.
            if fuzzy && is_duplicate(&merged, &global, config) {
                continue;
            }

            merged.push(global);
        }
    }

    merged
}

/// Whether `window` owns `line` under the given policy.
fn owns_line(
    window: &ChunkWindow,
    line: &TranscriptLine,
    step: f64,
    overlap: f64,
    last_index: usize,
    policy: ReconcilePolicy,
) -> bool {
    let relative_start = line.start_time_in_seconds;
    match policy {
        ReconcilePolicy::Tiling => {
            if window.index == last_index {
                // No next chunk to own the tail.
                relative_start < window.duration_seconds
            } else {
                relative_start < step
            }
        }
        ReconcilePolicy::OverlapDiscard => window.index == 0 || relative_start >= overlap,
    }
}

fn is_duplicate(merged: &[TranscriptLine], candidate: &TranscriptLine, config: &ReconcileConfig) -> bool {
    merged
        .iter()
        .any(|existing| same_utterance(existing, candidate, config))
}

/// Two lines describe the same utterance when their starts nearly coincide
/// and their English text begins identically.
fn same_utterance(a: &TranscriptLine, b: &TranscriptLine, config: &ReconcileConfig) -> bool {
    if (a.start_time_in_seconds - b.start_time_in_seconds).abs() >= config.fuzzy_epsilon_seconds {
        return false;
    }
    let prefix_a: String = a.english.chars().take(config.fuzzy_prefix_chars).collect();
    let prefix_b: String = b.english.chars().take(config.fuzzy_prefix_chars).collect();
    prefix_a.to_lowercase() == prefix_b.to_lowercase()
}
