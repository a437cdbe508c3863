//! Vocabulary merging across chunks.

use crate::transcript::{ChunkResult, VocabularyItem};
use std::collections::HashSet;

/// Fold every chunk's vocabulary into one deduplicated list.
///
/// Chunks are visited in index order and entries appended only when no
/// earlier entry has the same word case-insensitively. The first occurrence
/// keeps its `ipa`/`definition`/`example`; later duplicates are silently
/// discarded. Deterministic for a given chunk ordering.
pub fn merge_vocabularies(results: &[ChunkResult]) -> Vec<VocabularyItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for result in results {
        for item in &result.vocabulary {
            let key = item.word.to_lowercase();
            if seen.insert(key) {
                merged.push(item.clone());
            }
        }
    }

    merged
}
