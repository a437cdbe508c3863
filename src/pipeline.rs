//! Transcription job orchestration: raw audio → chunk plan → scheduled
//! oracle calls → reconciled, sorted transcript.

use crate::audio::{AudioDecoder, AudioEncoder, EncodedChunk, WavDecoder, WavEncoder};
use crate::config::JobConfig;
use crate::error::Result;
use crate::oracle::{ChunkMetadata, TranscriptionOracle};
use crate::progress::{NullReporter, ProgressReporter};
use crate::reconcile;
use crate::scheduler::{CancelToken, PreparedChunk, Scheduler};
use crate::segment::{self, ChunkWindow};
use crate::transcript::{self, TranscriptionResult};
use crate::vocab;
use std::sync::Arc;
use tracing::debug;

/// A single transcription job over one recording.
///
/// Owns the collaborators (decoder, encoder, oracle) and the configuration;
/// produces one `TranscriptionResult`. Only a source decode failure aborts
/// the job; individual chunk failures degrade to empty results and the job
/// carries on.
pub struct TranscriptionJob {
    config: JobConfig,
    decoder: Arc<dyn AudioDecoder>,
    encoder: Arc<dyn AudioEncoder>,
    oracle: Arc<dyn TranscriptionOracle>,
    progress: Arc<dyn ProgressReporter>,
    cancel: CancelToken,
}

impl TranscriptionJob {
    /// Creates a job with the default WAV decoder and encoder.
    pub fn new(config: JobConfig, oracle: Arc<dyn TranscriptionOracle>) -> Self {
        Self {
            config,
            decoder: Arc::new(WavDecoder),
            encoder: Arc::new(WavEncoder),
            oracle,
            progress: Arc::new(NullReporter),
            cancel: CancelToken::new(),
        }
    }

    /// Sets a custom audio decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn AudioDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Sets a custom window encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn AudioEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Sets a progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Returns a shared handle that cancels this job.
    ///
    /// Cancellation stops further chunk dispatch; the job returns whatever
    /// has already resolved.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the job with sample-accurate duration-based chunking.
    ///
    /// The recording is decoded to canonical PCM, windowed, and each window
    /// re-encoded as 16kHz mono WAV for the oracle.
    pub async fn run(&self, audio: &[u8]) -> Result<TranscriptionResult> {
        self.config.validate()?;

        self.progress.on_progress("Decoding audio", 0);
        let decoded = self.decoder.decode(audio)?;

        let windows =
            segment::plan_by_duration(decoded.duration_seconds(), &self.config.chunking)?;
        debug!(
            windows = windows.len(),
            duration_seconds = decoded.duration_seconds(),
            "planned duration-based chunks"
        );

        let mut prepared = Vec::with_capacity(windows.len());
        for window in &windows {
            let payload =
                self.encoder
                    .encode_window(&decoded, window.start_seconds, window.duration_seconds)?;
            prepared.push(PreparedChunk {
                metadata: metadata_for(window, windows.len()),
                payload,
            });
        }

        self.finish(windows, prepared).await
    }

    /// Run the job with byte-size-estimated chunking.
    ///
    /// For inputs whose timing cannot be windowed sample-accurately: the
    /// duration is probed with one side decode, chunk boundaries are placed
    /// proportionally in the raw byte stream, and each chunk ships its byte
    /// slice unchanged under `mime_type`. Offsets are approximate (constant
    /// bitrate assumption), so the fuzzy-dedup safety net is forced during
    /// reconciliation.
    pub async fn run_size_chunked(
        &self,
        audio: &[u8],
        mime_type: &str,
    ) -> Result<TranscriptionResult> {
        self.config.validate()?;

        self.progress.on_progress("Probing audio duration", 0);
        let probed = self.decoder.decode(audio)?;

        let windows = segment::plan_by_size(
            audio.len() as u64,
            probed.duration_seconds(),
            &self.config.chunking,
        )?;
        debug!(
            windows = windows.len(),
            total_bytes = audio.len(),
            "planned size-estimated chunks"
        );

        let mut prepared = Vec::with_capacity(windows.len());
        for window in &windows {
            let (start, end) = window.byte_range.unwrap_or((0, audio.len() as u64));
            prepared.push(PreparedChunk {
                metadata: metadata_for(window, windows.len()),
                payload: EncodedChunk {
                    bytes: audio[start as usize..end as usize].to_vec(),
                    mime_type: mime_type.to_string(),
                },
            });
        }

        self.finish(windows, prepared).await
    }

    async fn finish(
        &self,
        windows: Vec<ChunkWindow>,
        prepared: Vec<PreparedChunk>,
    ) -> Result<TranscriptionResult> {
        if windows.is_empty() {
            self.progress.on_progress("Transcription complete", 100);
            return Ok(TranscriptionResult::default());
        }

        self.progress
            .on_progress(&format!("Transcribing {} chunks", windows.len()), 0);

        let scheduler = Scheduler::new(self.config.scheduler.clone());
        let results = scheduler
            .run(
                prepared,
                self.oracle.clone(),
                self.progress.clone(),
                &self.cancel,
            )
            .await;

        let vocabulary = vocab::merge_vocabularies(&results);
        let mut lines =
            reconcile::merge(&windows, results, &self.config.chunking, &self.config.reconcile);
        transcript::sort_transcript(&mut lines);

        if self.cancel.is_cancelled() {
            // Partial result: the job did not complete, so 100 is never
            // reported.
            debug!(lines = lines.len(), "job cancelled; returning partial result");
        } else {
            self.progress.on_progress("Transcription complete", 100);
        }

        Ok(TranscriptionResult {
            transcript: lines,
            vocabulary,
        })
    }
}

fn metadata_for(window: &ChunkWindow, total_chunks: usize) -> ChunkMetadata {
    ChunkMetadata {
        index: window.index,
        total_chunks,
        global_start_seconds: window.start_seconds,
        duration_seconds: window.duration_seconds,
    }
}
