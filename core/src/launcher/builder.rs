//! Builder pattern for Launcher construction

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::{LaunchConfig, Verbosity};
use crate::error::{Error, Result};
use crate::event::{EventSender, LaunchEvent};
use crate::traits::SleepSampler;

use super::executor::Launcher;

/// Builder for creating a Launcher with proper configuration
///
/// # Example
///
/// ```ignore
/// let (launcher, events_rx) = LauncherBuilder::new()
///     .worker_count(1000)
///     .inter_spawn_delay(Duration::from_millis(5))
///     .max_random_sleep(10)
///     .verbosity(Verbosity::Basic)
///     .sampler(sampler)
///     .build()?;
/// ```
pub struct LauncherBuilder {
    config: LaunchConfig,
    sampler: Option<Arc<dyn SleepSampler>>,
}

impl LauncherBuilder {
    /// Create a new launcher builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LaunchConfig::default(),
            sampler: None,
        }
    }

    /// Set the full launch configuration
    pub fn config(mut self, config: LaunchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the worker count
    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.config.worker_count = worker_count;
        self
    }

    /// Set the delay between spawns
    pub fn inter_spawn_delay(mut self, delay: Duration) -> Self {
        self.config.inter_spawn_delay = delay;
        self
    }

    /// Set the maximum random sleep in seconds
    pub fn max_random_sleep(mut self, seconds: u64) -> Self {
        self.config.max_random_sleep = seconds;
        self
    }

    /// Set the verbosity level
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    /// Set the sleep sampler
    pub fn sampler(mut self, sampler: Arc<dyn SleepSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Build the launcher and return it along with the event receiver
    ///
    /// # Errors
    ///
    /// Returns an error if no sampler is set or if configuration
    /// validation fails.
    pub fn build(self) -> Result<(Launcher, mpsc::UnboundedReceiver<LaunchEvent>)> {
        let sampler = self
            .sampler
            .ok_or_else(|| Error::missing_config("sampler"))?;

        self.config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        let (events, events_rx) = EventSender::channel();

        let launcher = Launcher::new(self.config, sampler, events);

        Ok((launcher, events_rx))
    }
}

impl Default for LauncherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
