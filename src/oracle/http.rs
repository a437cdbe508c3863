//! HTTP reference implementation of the transcription oracle.
//!
//! Posts one JSON request per chunk: the window's audio as base64 plus the
//! chunk's position in the job, and expects the oracle's JSON contract back
//! (`transcript` + `vocabulary`, chunk-relative timestamps).

use crate::audio::EncodedChunk;
use crate::error::{LingscribeError, Result};
use crate::oracle::{ChunkMetadata, TranscriptionOracle};
use crate::transcript::ChunkResult;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use std::time::Duration;

/// Configuration for the HTTP oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpOracleConfig {
    /// Endpoint receiving transcription requests.
    pub endpoint: String,
    /// Optional bearer token attached to every request.
    pub api_token: Option<String>,
    /// Transport-level timeout per request in milliseconds.
    ///
    /// This bounds a single HTTP exchange; the scheduler applies its own
    /// per-chunk timeout on top.
    pub request_timeout_ms: u64,
}

impl HttpOracleConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_token: None,
            request_timeout_ms: 90_000,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    /// Override the transport timeout.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }
}

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio: String,
    mime_type: &'a str,
    chunk_index: usize,
    total_chunks: usize,
    chunk_offset_seconds: f64,
    chunk_duration_seconds: f64,
}

/// Oracle client speaking the JSON contract over HTTP.
pub struct HttpOracle {
    client: reqwest::Client,
    config: HttpOracleConfig,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| LingscribeError::OracleRequest {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn request_body<'a>(
        chunk: &EncodedChunk,
        metadata: &'a ChunkMetadata,
        mime_type: &'a str,
    ) -> TranscribeRequest<'a> {
        TranscribeRequest {
            audio: BASE64.encode(&chunk.bytes),
            mime_type,
            chunk_index: metadata.index,
            total_chunks: metadata.total_chunks,
            chunk_offset_seconds: metadata.global_start_seconds,
            chunk_duration_seconds: metadata.duration_seconds,
        }
    }
}

#[async_trait]
impl TranscriptionOracle for HttpOracle {
    async fn transcribe(
        &self,
        chunk: &EncodedChunk,
        metadata: &ChunkMetadata,
    ) -> Result<ChunkResult> {
        let body = Self::request_body(chunk, metadata, &chunk.mime_type);

        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(ref token) = self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LingscribeError::OracleRequest {
                message: format!("request for chunk {} failed: {e}", metadata.index),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LingscribeError::OracleRequest {
                message: format!("oracle returned status {status} for chunk {}", metadata.index),
            });
        }

        response
            .json::<ChunkResult>()
            .await
            .map_err(|e| LingscribeError::OracleResponse {
                message: format!("unparseable JSON for chunk {}: {e}", metadata.index),
            })
    }
}
