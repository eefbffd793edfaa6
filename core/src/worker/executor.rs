//! Worker execution

use crate::config::Verbosity;
use crate::counters::SharedCounters;
use crate::event::{EventSender, LaunchEvent};
use crate::traits::SleepSampler;

use super::outcome::WorkerOutcome;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Worker performs one unit of simulated work inside its own tokio task
///
/// Workers are spawned and joined by the Launcher. They share the counters
/// and the sampler via Arc and never hold a lock across their sleep.
pub struct Worker {
    /// Worker identifier, starting at 1
    id: usize,

    /// Counters shared with every other worker of the launch
    counters: Arc<SharedCounters>,

    /// Sleep sampler (shared across workers via Arc)
    sampler: Arc<dyn SleepSampler>,

    /// Inclusive upper bound of the drawn sleep, in seconds
    max_random_sleep: u64,

    /// Progress reporting level
    verbosity: Verbosity,

    /// Progress event sink
    events: Option<EventSender>,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        counters: Arc<SharedCounters>,
        sampler: Arc<dyn SleepSampler>,
        max_random_sleep: u64,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            id,
            counters,
            sampler,
            max_random_sleep,
            verbosity,
            events: None,
        }
    }

    /// Attach a progress event sink
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Run the worker to completion
    ///
    /// Cannot fail: the counter updates are atomic and the sleep always
    /// returns. A shutdown signal only shortens the sleep; the active count is
    /// decremented either way.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> WorkerOutcome {
        let started = Instant::now();

        let active = self.counters.worker_started();
        let sleep_seconds = self
            .sampler
            .sample(self.max_random_sleep)
            .min(self.max_random_sleep);
        self.counters.add_sleep(sleep_seconds);

        tracing::debug!(
            worker_id = self.id,
            active,
            sleep_seconds,
            "Worker started"
        );
        if self.verbosity >= Verbosity::Detailed {
            self.emit(LaunchEvent::WorkerBegan {
                worker_id: self.id,
                active,
                sleep_seconds,
            });
        }

        let interrupted = tokio::select! {
            biased;

            _ = shutdown_signalled(&mut shutdown) => true,
            _ = tokio::time::sleep(Duration::from_secs(sleep_seconds)) => false,
        };

        let active = self.counters.worker_finished();

        tracing::debug!(
            worker_id = self.id,
            active,
            interrupted,
            "Worker finished"
        );
        if self.verbosity >= Verbosity::Detailed {
            self.emit(LaunchEvent::WorkerEnded {
                worker_id: self.id,
                active,
            });
        }

        WorkerOutcome {
            worker_id: self.id,
            sleep_seconds,
            elapsed: started.elapsed(),
            interrupted,
        }
    }

    fn emit(&self, event: LaunchEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("sampler", &self.sampler.name())
            .field("max_random_sleep", &self.max_random_sleep)
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

/// Resolve once a shutdown has been broadcast
///
/// A closed channel means the sender went away without signalling, which is
/// not a shutdown, so this then never resolves.
pub(crate) async fn shutdown_signalled(shutdown: &mut broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending().await,
    }
}
