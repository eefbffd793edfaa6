//! Launcher execution logic

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::config::{LaunchConfig, Verbosity};
use crate::counters::SharedCounters;
use crate::error::{Error, Result};
use crate::event::{EventSender, LaunchEvent};
use crate::traits::SleepSampler;
use crate::worker::{shutdown_signalled, WorkerBuilder};

use super::report::{Report, SpawnPhase};

/// Upper bound on the handle vector's initial allocation
const MAX_PRESIZED_HANDLES: usize = 65_536;

/// Launcher manages one spawn/join run
///
/// Responsible for spawning workers, coordinating shutdown,
/// and reporting once every worker has been joined.
pub struct Launcher {
    /// Launch configuration
    pub(crate) config: LaunchConfig,

    /// Sleep sampler (shared across workers)
    pub(crate) sampler: Arc<dyn SleepSampler>,

    /// Progress event sink (cloned for each worker)
    pub(crate) events: EventSender,

    /// Shutdown signal sender
    pub(crate) shutdown_tx: broadcast::Sender<()>,
}

impl Launcher {
    /// Create a new launcher
    ///
    /// Use `LauncherBuilder` for a more ergonomic construction.
    pub fn new(config: LaunchConfig, sampler: Arc<dyn SleepSampler>, events: EventSender) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            sampler,
            events,
            shutdown_tx,
        }
    }

    /// Trigger shutdown of all workers and stop spawning new ones
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Get the launch configuration
    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Run the launch
    ///
    /// Spawns every worker, joins all of them, and returns the report. The
    /// counters are only read after the last join, so the report sees every
    /// worker's final decrement.
    ///
    /// # Errors
    ///
    /// Fails if a worker task could not be joined (it panicked or was
    /// aborted); the remaining workers are still joined first. Also fails if
    /// memory for another worker handle cannot be reserved, after joining
    /// the workers already spawned.
    pub async fn run(&self) -> Result<Report> {
        let started_at = Utc::now();
        let start = Instant::now();
        let counters = Arc::new(SharedCounters::new());
        let mut launcher_shutdown = self.shutdown_tx.subscribe();
        let mut handles = Vec::with_capacity(self.config.worker_count.min(MAX_PRESIZED_HANDLES));
        let mut cancelled = false;
        let mut failure = None;

        tracing::info!(
            worker_count = self.config.worker_count,
            inter_spawn_delay_ms = self.config.inter_spawn_delay.as_millis() as u64,
            max_random_sleep = self.config.max_random_sleep,
            verbosity = %self.config.verbosity,
            sampler = self.sampler.name(),
            "Launching workers"
        );

        // Spawn worker tasks
        for worker_id in 1..=self.config.worker_count {
            let worker = WorkerBuilder::new(worker_id)
                .counters(Arc::clone(&counters))
                .sampler(Arc::clone(&self.sampler))
                .max_random_sleep(self.config.max_random_sleep)
                .verbosity(self.config.verbosity)
                .events(self.events.clone())
                .build()?;

            // Subscribe before checking, so a shutdown sent in between still
            // reaches this worker
            let shutdown_rx = self.shutdown_tx.subscribe();
            if shutdown_requested(&mut launcher_shutdown) {
                cancelled = true;
                break;
            }

            if let Err(e) = handles.try_reserve(1) {
                tracing::error!(worker_id, error = %e, "Cannot track another worker");
                failure = Some(Error::worker(format!(
                    "cannot reserve a handle for worker {worker_id}: {e}"
                )));
                // Wake the workers already running so the join is quick
                self.shutdown();
                break;
            }
            handles.push((worker.id(), tokio::spawn(worker.run(shutdown_rx))));

            if worker_id < self.config.worker_count
                && !self.pause_between_spawns(&mut launcher_shutdown).await
            {
                cancelled = true;
                break;
            }
        }

        let spawn_phase = SpawnPhase {
            spawned: handles.len(),
            launched: counters.total_launched(),
            active: counters.active_count(),
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            spawned = spawn_phase.spawned,
            launched = spawn_phase.launched,
            active = spawn_phase.active,
            elapsed_ms = spawn_phase.elapsed.as_millis() as u64,
            cancelled,
            "Spawn phase complete"
        );
        if self.config.verbosity >= Verbosity::Basic {
            self.events.emit(LaunchEvent::SpawnPhaseComplete(spawn_phase));
        }

        // Wait for all workers to complete
        let mut outcomes = Vec::with_capacity(handles.len());
        for (worker_id, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!(worker_id, error = %e, "Worker task failed");
                    failure.get_or_insert_with(|| {
                        Error::worker(format!("worker {worker_id} did not complete: {e}"))
                    });
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        let report = Report::new(
            started_at,
            counters.snapshot(),
            start.elapsed(),
            spawn_phase,
            &outcomes,
            cancelled,
        );
        tracing::info!(
            elapsed_secs = report.elapsed_secs(),
            total_launched = report.total_launched,
            final_active_count = report.final_active_count,
            total_sleep_seconds = report.total_sleep_seconds,
            interrupted = report.interrupted_workers,
            cancelled = report.cancelled,
            "Launch completed"
        );
        if !report.is_balanced() {
            tracing::warn!(
                final_active_count = report.final_active_count,
                "Workers still counted as active after the join"
            );
        }

        Ok(report)
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Automatically triggers graceful shutdown on Ctrl+C.
    pub async fn run_with_signal_handling(&self) -> Result<Report> {
        let shutdown_tx = self.shutdown_tx.clone();

        // Spawn signal handler task
        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        // Abort signal handler if still running
        signal_handle.abort();

        result
    }

    /// Run with a timeout
    ///
    /// Automatically triggers shutdown when timeout is reached.
    pub async fn run_with_timeout(&self, timeout: Duration) -> Result<Report> {
        let shutdown_tx = self.shutdown_tx.clone();

        // Spawn timeout task
        let timeout_handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::info!("Timeout reached, initiating shutdown...");
            let _ = shutdown_tx.send(());
        });

        let result = self.run().await;

        // Abort timeout task if still running
        timeout_handle.abort();

        result
    }

    /// Sleep for the inter-spawn delay, returning `false` if shut down meanwhile
    async fn pause_between_spawns(&self, shutdown: &mut broadcast::Receiver<()>) -> bool {
        let delay = self.config.inter_spawn_delay;
        if delay.is_zero() {
            return true;
        }

        tokio::select! {
            biased;

            _ = shutdown_signalled(shutdown) => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

/// Non-blocking check for a pending shutdown signal
fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    matches!(
        shutdown.try_recv(),
        Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_))
    )
}

impl std::fmt::Debug for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("config", &self.config)
            .field("sampler", &self.sampler.name())
            .finish()
    }
}
