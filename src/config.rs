use crate::error::Result;
use crate::reconcile::ReconcileConfig;
use crate::scheduler::SchedulerConfig;
use crate::segment::ChunkingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct JobConfig {
    pub chunking: ChunkingConfig,
    pub scheduler: SchedulerConfig,
    pub reconcile: ReconcileConfig,
}

impl JobConfig {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: JobConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LINGSCRIBE_WINDOW_SECONDS → chunking.window_seconds
    /// - LINGSCRIBE_OVERLAP_SECONDS → chunking.overlap_seconds
    /// - LINGSCRIBE_MAX_CONCURRENCY → scheduler.max_concurrency
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(window) = std::env::var("LINGSCRIBE_WINDOW_SECONDS")
            && let Ok(window) = window.parse::<f64>()
        {
            self.chunking.window_seconds = window;
        }

        if let Ok(overlap) = std::env::var("LINGSCRIBE_OVERLAP_SECONDS")
            && let Ok(overlap) = overlap.parse::<f64>()
        {
            self.chunking.overlap_seconds = overlap;
        }

        if let Ok(concurrency) = std::env::var("LINGSCRIBE_MAX_CONCURRENCY")
            && let Ok(concurrency) = concurrency.parse::<usize>()
        {
            self.scheduler.max_concurrency = concurrency;
        }

        self
    }

    /// Reject configurations that cannot run a job.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}
