//! Transcript data model shared across the job.
//!
//! Wire field names (`startTimeInSeconds` and friends) follow the oracle's
//! JSON contract; timestamps are deserialized leniently because the oracle
//! is untrusted output.

use crate::timecode;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One line of the bilingual transcript.
///
/// Timestamps are chunk-relative (0.0 = start of the chunk's audio) as
/// produced by the oracle, and global after reconciliation adds the chunk's
/// offset. The oracle contract promises `end >= start`; it is not enforced
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptLine {
    pub speaker: String,
    pub english: String,
    pub chinese: String,
    #[serde(deserialize_with = "timecode::lenient_seconds")]
    pub start_time_in_seconds: f64,
    #[serde(deserialize_with = "timecode::lenient_seconds")]
    pub end_time_in_seconds: f64,
}

/// One vocabulary entry extracted by the oracle.
///
/// Identity is the `word` field compared case-insensitively; the first
/// occurrence's `ipa`/`definition`/`example` win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyItem {
    pub word: String,
    pub ipa: String,
    pub definition: String,
    pub example: String,
}

/// The chunk-local result of one oracle call.
///
/// The empty result is a sentinel for a failed or unusable chunk, never an
/// error value: it contributes zero lines and zero vocabulary but does not
/// abort the job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkResult {
    pub transcript: Vec<TranscriptLine>,
    pub vocabulary: Vec<VocabularyItem>,
}

impl ChunkResult {
    /// The failed-chunk sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty() && self.vocabulary.is_empty()
    }
}

/// The final output of a transcription job.
///
/// `transcript` is in global coordinates, sorted ascending by start time;
/// `vocabulary` is deduplicated case-insensitively in first-seen order.
/// Owned exclusively by the caller once the job returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptionResult {
    pub transcript: Vec<TranscriptLine>,
    pub vocabulary: Vec<VocabularyItem>,
}

/// Sort a global transcript ascending by start time.
///
/// The sort is stable: lines with equal start times keep their append
/// order, so reconciliation order breaks ties deterministically.
pub fn sort_transcript(lines: &mut [TranscriptLine]) {
    lines.sort_by(|a, b| {
        a.start_time_in_seconds
            .partial_cmp(&b.start_time_in_seconds)
            .unwrap_or(Ordering::Equal)
    });
}
