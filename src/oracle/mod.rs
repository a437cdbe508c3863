//! The external transcription oracle interface.
//!
//! The oracle is an opaque, possibly unreliable, rate-limited collaborator:
//! it receives one encoded window plus its metadata and returns a
//! chunk-local `ChunkResult`. Everything about how it transcribes and
//! translates is behind this boundary; the engine is tested against
//! scripted implementations, never the real service.

pub mod http;

pub use http::{HttpOracle, HttpOracleConfig};

use crate::audio::EncodedChunk;
use crate::error::{LingscribeError, Result};
use crate::transcript::ChunkResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Context sent alongside a chunk's audio.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMetadata {
    /// Position of this chunk in the plan, starting at 0.
    pub index: usize,
    /// Total number of chunks in the job.
    pub total_chunks: usize,
    /// Global start of this chunk in seconds.
    pub global_start_seconds: f64,
    /// Length of this chunk in seconds.
    pub duration_seconds: f64,
}

/// Trait for the external transcription oracle.
///
/// This trait allows swapping implementations (real HTTP service vs mock).
/// Returned timestamps are chunk-relative floats starting at 0.0.
#[async_trait]
pub trait TranscriptionOracle: Send + Sync {
    /// Transcribe one encoded chunk.
    async fn transcribe(
        &self,
        chunk: &EncodedChunk,
        metadata: &ChunkMetadata,
    ) -> Result<ChunkResult>;
}

/// Implement TranscriptionOracle for Arc<T> to allow sharing across tasks.
#[async_trait]
impl<T: TranscriptionOracle + ?Sized> TranscriptionOracle for Arc<T> {
    async fn transcribe(
        &self,
        chunk: &EncodedChunk,
        metadata: &ChunkMetadata,
    ) -> Result<ChunkResult> {
        (**self).transcribe(chunk, metadata).await
    }
}

/// Scripted oracle for testing.
///
/// Returns a pre-scripted `ChunkResult` per chunk index, optionally after an
/// artificial delay. Indices without a script return the default result.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    results: HashMap<usize, ChunkResult>,
    failures: HashMap<usize, String>,
    default_result: ChunkResult,
    delay: Option<Duration>,
}

impl ScriptedOracle {
    /// Create a scripted oracle that answers every chunk with the empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for a specific chunk index.
    pub fn with_result(mut self, index: usize, result: ChunkResult) -> Self {
        self.results.insert(index, result);
        self
    }

    /// Script a failure for a specific chunk index.
    pub fn with_failure(mut self, index: usize, message: &str) -> Self {
        self.failures.insert(index, message.to_string());
        self
    }

    /// Configure the result returned for unscripted indices.
    pub fn with_default(mut self, result: ChunkResult) -> Self {
        self.default_result = result;
        self
    }

    /// Configure an artificial latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TranscriptionOracle for ScriptedOracle {
    async fn transcribe(
        &self,
        _chunk: &EncodedChunk,
        metadata: &ChunkMetadata,
    ) -> Result<ChunkResult> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failures.get(&metadata.index) {
            return Err(LingscribeError::OracleRequest {
                message: message.clone(),
            });
        }
        Ok(self
            .results
            .get(&metadata.index)
            .cloned()
            .unwrap_or_else(|| self.default_result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptLine;

    fn chunk() -> EncodedChunk {
        EncodedChunk {
            bytes: vec![0u8; 4],
            mime_type: "audio/wav".to_string(),
        }
    }

    fn metadata(index: usize) -> ChunkMetadata {
        ChunkMetadata {
            index,
            total_chunks: 3,
            global_start_seconds: index as f64 * 160.0,
            duration_seconds: 180.0,
        }
    }

    fn result_with_line(english: &str) -> ChunkResult {
        ChunkResult {
            transcript: vec![TranscriptLine {
                english: english.to_string(),
                ..Default::default()
            }],
            vocabulary: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_scripted_result_per_index() {
        let oracle = ScriptedOracle::new()
            .with_result(0, result_with_line("chunk zero"))
            .with_result(1, result_with_line("chunk one"));

        let r0 = oracle.transcribe(&chunk(), &metadata(0)).await.unwrap();
        let r1 = oracle.transcribe(&chunk(), &metadata(1)).await.unwrap();
        assert_eq!(r0.transcript[0].english, "chunk zero");
        assert_eq!(r1.transcript[0].english, "chunk one");
    }

    #[tokio::test]
    async fn test_unscripted_index_returns_default() {
        let oracle = ScriptedOracle::new();
        let result = oracle.transcribe(&chunk(), &metadata(7)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let oracle = ScriptedOracle::new().with_failure(2, "rate limited");
        let result = oracle.transcribe(&chunk(), &metadata(2)).await;
        match result {
            Err(LingscribeError::OracleRequest { message }) => {
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected OracleRequest error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oracle_trait_is_object_safe() {
        let oracle: Arc<dyn TranscriptionOracle> =
            Arc::new(ScriptedOracle::new().with_result(0, result_with_line("boxed")));
        let result = oracle.transcribe(&chunk(), &metadata(0)).await.unwrap();
        assert_eq!(result.transcript[0].english, "boxed");
    }
}
