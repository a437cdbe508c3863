//! Progress reporting for transcription jobs.

use std::sync::Mutex;

/// Trait for receiving job progress updates.
///
/// Invoked once at job start, at least once per chunk completion, and once
/// at job end with `percent = 100` (success only). Percentages are
/// monotonically non-decreasing even though chunks complete out of order.
pub trait ProgressReporter: Send + Sync {
    /// Reports a progress update.
    fn on_progress(&self, message: &str, percent: u8);
}

/// Reporter that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn on_progress(&self, _message: &str, _percent: u8) {}
}

/// Reporter that logs updates through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_progress(&self, message: &str, percent: u8) {
        tracing::info!(percent, "{message}");
    }
}

/// Reporter that records every update, for tests and UIs that poll.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<(String, u8)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates received so far, in arrival order.
    pub fn events(&self) -> Vec<(String, u8)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The percentages received so far, in arrival order.
    pub fn percents(&self) -> Vec<u8> {
        self.events().into_iter().map(|(_, p)| p).collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn on_progress(&self, message: &str, percent: u8) {
        if let Ok(mut events) = self.events.lock() {
            events.push((message.to_string(), percent));
        }
    }
}
