//! Progress events emitted during a launch
//!
//! Events are purely observational. Workers and the launcher push them into an
//! unbounded channel and never wait on the receiving side, so a slow or
//! dropped consumer cannot change how a launch runs.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::launcher::SpawnPhase;

/// Progress notification from a running launch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LaunchEvent {
    /// A worker started and drew its sleep (detailed verbosity)
    WorkerBegan {
        /// Worker identifier, starting at 1
        worker_id: usize,
        /// Active workers right after this one started
        active: usize,
        /// Drawn sleep in seconds
        sleep_seconds: u64,
    },

    /// A worker finished sleeping (detailed verbosity)
    WorkerEnded {
        /// Worker identifier, starting at 1
        worker_id: usize,
        /// Active workers right after this one finished
        active: usize,
    },

    /// Every worker has been spawned (basic verbosity and above)
    SpawnPhaseComplete(SpawnPhase),
}

/// Sending half handed to workers and the launcher
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<LaunchEvent>,
}

impl EventSender {
    /// Create a connected sender/receiver pair
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LaunchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event, ignoring a closed receiver
    pub fn emit(&self, event: LaunchEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped, discarding event");
        }
    }
}
