//! Bounded-concurrency dispatch of chunk tasks to the oracle.
//!
//! Chunks are dispatched in index order but complete in any order; each
//! task owns one reserved slot in the result sequence and writes it exactly
//! once. Admission is event-driven through a semaphore, so at most
//! `max_concurrency` oracle calls are in flight at any instant. A failing
//! or timed-out call degrades its slot to the empty sentinel; it never
//! aborts the job.

use crate::audio::EncodedChunk;
use crate::defaults;
use crate::error::{LingscribeError, Result};
use crate::oracle::{ChunkMetadata, TranscriptionOracle};
use crate::progress::ProgressReporter;
use crate::transcript::ChunkResult;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Duration, sleep, timeout};
use tracing::warn;

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of oracle calls in flight at once.
    pub max_concurrency: usize,
    /// Delay between consecutive chunk dispatches in milliseconds.
    /// Smooths request bursts against a rate-limited oracle; zero disables.
    pub stagger_ms: u64,
    /// Per-chunk oracle timeout in milliseconds. On expiry the chunk
    /// degrades to the empty result and the job continues.
    pub chunk_timeout_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: defaults::MAX_CONCURRENCY,
            stagger_ms: defaults::STAGGER_MS,
            chunk_timeout_ms: defaults::CHUNK_TIMEOUT_MS,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(LingscribeError::ConfigInvalidValue {
                key: "max_concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.chunk_timeout_ms == 0 {
            return Err(LingscribeError::ConfigInvalidValue {
                key: "chunk_timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Shared handle to cancel a running job.
///
/// Cancellation stops the scheduler from dispatching further chunks;
/// chunks already in flight settle normally and their results are kept.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One chunk ready for dispatch: its metadata plus the encoded payload.
#[derive(Debug, Clone)]
pub struct PreparedChunk {
    pub metadata: ChunkMetadata,
    pub payload: EncodedChunk,
}

/// Runs chunk tasks against the oracle under a concurrency ceiling.
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Run every chunk to completion and return the index-aligned results.
    ///
    /// The returned vector always has one slot per input chunk. Slots whose
    /// oracle call failed, timed out, panicked, or was never dispatched
    /// (cancellation) hold the empty result. Progress percentages reported
    /// through `progress` are monotonically non-decreasing even though
    /// chunks complete out of order.
    pub async fn run(
        &self,
        chunks: Vec<PreparedChunk>,
        oracle: Arc<dyn TranscriptionOracle>,
        progress: Arc<dyn ProgressReporter>,
        cancel: &CancelToken,
    ) -> Vec<ChunkResult> {
        let total = chunks.len();
        let mut slots = vec![ChunkResult::empty(); total];
        if total == 0 {
            return slots;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let completed = Arc::new(AtomicUsize::new(0));
        let reported_percent: Arc<Mutex<u8>> = Arc::new(Mutex::new(0));
        let mut tasks: JoinSet<(usize, ChunkResult)> = JoinSet::new();

        for (slot, chunk) in chunks.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    dispatched = slot,
                    total, "job cancelled; remaining chunks not dispatched"
                );
                break;
            }

            if slot > 0 && self.config.stagger_ms > 0 {
                sleep(Duration::from_millis(self.config.stagger_ms)).await;
            }

            // Acquire before spawning: dispatch follows chunk index and the
            // ceiling holds without any polling.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let oracle = oracle.clone();
            let progress = progress.clone();
            let completed = completed.clone();
            let reported_percent = reported_percent.clone();
            let timeout_ms = self.config.chunk_timeout_ms;

            tasks.spawn(async move {
                let _permit = permit;
                let index = chunk.metadata.index;

                let call = oracle.transcribe(&chunk.payload, &chunk.metadata);
                let outcome = match timeout(Duration::from_millis(timeout_ms), call).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(LingscribeError::OracleTimeout { index, timeout_ms }),
                };
                let result = match outcome {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(chunk = index, error = %e, "oracle call failed; slot degrades to empty");
                        ChunkResult::empty()
                    }
                };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                let percent = ((done * 100) / total) as u8;
                // Completions race; deliver reports under the lock so the
                // observed percentage never steps backwards.
                if let Ok(mut last) = reported_percent.lock() {
                    let percent = percent.max(*last);
                    *last = percent;
                    progress.on_progress(
                        &format!("Transcribed chunk {done} of {total}"),
                        percent,
                    );
                }

                (slot, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, result)) => slots[slot] = result,
                Err(e) => {
                    warn!(error = %e, "chunk task panicked; slot left empty");
                }
            }
        }

        slots
    }
}
