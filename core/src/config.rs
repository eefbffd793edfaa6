//! Launch configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of workers to launch
pub const DEFAULT_WORKER_COUNT: usize = 10_000;

/// Default upper bound, in seconds, for each worker's random sleep
pub const DEFAULT_MAX_RANDOM_SLEEP: u64 = 10;

/// How much progress the launcher reports while running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only the final report
    #[default]
    Silent,
    /// Counts after the spawn phase
    Basic,
    /// Per-worker begin and end lines
    Detailed,
}

impl Verbosity {
    /// Human readable label for banners
    pub fn label(&self) -> &'static str {
        match self {
            Verbosity::Silent => "silent",
            Verbosity::Basic => "basic",
            Verbosity::Detailed => "detailed",
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Verbosity::Silent),
            1 => Ok(Verbosity::Basic),
            2 => Ok(Verbosity::Detailed),
            other => Err(ConfigError::InvalidVerbosity(other)),
        }
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Clamp a requested worker count to the supported minimum of one
pub fn clamp_worker_count(requested: i64) -> usize {
    if requested < 1 {
        tracing::warn!(requested, "worker count below 1, clamping to 1");
        1
    } else {
        usize::try_from(requested).unwrap_or(usize::MAX)
    }
}

/// Launch configuration
///
/// Describes how many workers to spawn, how to pace the spawns and how long
/// each worker may sleep. Treat it as immutable once handed to a launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Number of worker tasks to spawn
    pub worker_count: usize,

    /// Pause taken by the launcher between two spawns
    pub inter_spawn_delay: Duration,

    /// Inclusive upper bound, in seconds, of each worker's random sleep
    pub max_random_sleep: u64,

    /// Progress reporting level
    pub verbosity: Verbosity,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            inter_spawn_delay: Duration::ZERO,
            max_random_sleep: DEFAULT_MAX_RANDOM_SLEEP,
            verbosity: Verbosity::default(),
        }
    }
}

impl LaunchConfig {
    /// Create a new config with the given worker count (clamped to at least 1)
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count: worker_count.max(1),
            ..Default::default()
        }
    }

    /// Set the delay between spawns
    pub fn with_inter_spawn_delay(mut self, delay: Duration) -> Self {
        self.inter_spawn_delay = delay;
        self
    }

    /// Set the maximum random sleep in seconds
    pub fn with_max_random_sleep(mut self, seconds: u64) -> Self {
        self.max_random_sleep = seconds;
        self
    }

    /// Set the verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount(
                "worker count must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(String),

    /// Verbosity level outside 0..=2
    #[error("Invalid verbosity level {0}, expected 0, 1 or 2")]
    InvalidVerbosity(u8),
}
