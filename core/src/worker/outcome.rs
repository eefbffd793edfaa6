//! Result of a single worker run

use serde::Serialize;
use std::time::Duration;

/// What one worker did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerOutcome {
    /// Worker identifier, starting at 1
    pub worker_id: usize,

    /// Drawn sleep in seconds
    pub sleep_seconds: u64,

    /// Time actually spent in the worker
    pub elapsed: Duration,

    /// Whether a shutdown signal cut the sleep short
    pub interrupted: bool,
}

impl WorkerOutcome {
    /// Whether the worker slept for its full drawn duration
    pub fn completed(&self) -> bool {
        !self.interrupted
    }
}
