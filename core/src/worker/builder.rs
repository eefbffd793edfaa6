//! Builder pattern for Worker construction

use crate::config::Verbosity;
use crate::counters::SharedCounters;
use crate::error::{Error, Result};
use crate::event::EventSender;
use crate::traits::SleepSampler;

use super::executor::Worker;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(1)
///     .counters(counters)
///     .sampler(sampler)
///     .max_random_sleep(10)
///     .verbosity(Verbosity::Detailed)
///     .events(events)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    counters: Option<Arc<SharedCounters>>,
    sampler: Option<Arc<dyn SleepSampler>>,
    max_random_sleep: u64,
    verbosity: Verbosity,
    events: Option<EventSender>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            counters: None,
            sampler: None,
            max_random_sleep: 0,
            verbosity: Verbosity::default(),
            events: None,
        }
    }

    /// Set the shared counters
    pub fn counters(mut self, counters: Arc<SharedCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Set the sleep sampler
    pub fn sampler(mut self, sampler: Arc<dyn SleepSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    /// Set the inclusive upper bound of the sleep, in seconds
    pub fn max_random_sleep(mut self, seconds: u64) -> Self {
        self.max_random_sleep = seconds;
        self
    }

    /// Set the verbosity level
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the progress event sink
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if the counters or the sampler are missing.
    pub fn build(self) -> Result<Worker> {
        let counters = self.counters.ok_or(Error::missing_config("counters"))?;
        let sampler = self.sampler.ok_or(Error::missing_config("sampler"))?;

        let worker = Worker::new(
            self.id,
            counters,
            sampler,
            self.max_random_sleep,
            self.verbosity,
        );

        Ok(match self.events {
            Some(events) => worker.with_events(events),
            None => worker,
        })
    }
}
