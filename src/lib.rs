//! lingscribe - chunked bilingual transcription for long-form audio.
//!
//! Slices one long recording into overlapping windows, dispatches each
//! window to an external transcription oracle under bounded concurrency,
//! and reconciles the chunk-local results into a single globally ordered,
//! deduplicated transcript plus a vocabulary list.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod oracle;
pub mod pipeline;
pub mod progress;
pub mod reconcile;
pub mod scheduler;
pub mod segment;
pub mod timecode;
pub mod transcript;
pub mod vocab;

// Collaborator traits (decode → encode → transcribe)
pub use audio::{AudioDecoder, AudioEncoder, DecodedAudio, EncodedChunk, WavDecoder, WavEncoder};
pub use oracle::{
    ChunkMetadata, HttpOracle, HttpOracleConfig, ScriptedOracle, TranscriptionOracle,
};

// Job composition root
pub use pipeline::TranscriptionJob;
pub use progress::{CollectingReporter, LogReporter, NullReporter, ProgressReporter};
pub use scheduler::{CancelToken, PreparedChunk, Scheduler, SchedulerConfig};

// Data model
pub use transcript::{ChunkResult, TranscriptLine, TranscriptionResult, VocabularyItem};

// Config
pub use config::JobConfig;
pub use reconcile::{ReconcileConfig, ReconcilePolicy};
pub use segment::{ChunkWindow, ChunkingConfig};

// Error handling
pub use error::{LingscribeError, Result};
