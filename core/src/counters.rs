//! Counters shared by every worker of a launch

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters mutated concurrently by all workers
///
/// Every update is a single atomic read-modify-write, so no update is lost
/// however the workers interleave. Share it through an `Arc`.
#[derive(Debug, Default)]
pub struct SharedCounters {
    total_launched: AtomicUsize,
    active_count: AtomicUsize,
    total_sleep_seconds: AtomicU64,
}

/// Point-in-time copy of [`SharedCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Workers that have started
    pub total_launched: usize,

    /// Workers currently between start and completion
    pub active_count: usize,

    /// Sum of every drawn sleep, in seconds
    pub total_sleep_seconds: u64,
}

impl SharedCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a worker start, returning the active count including it
    pub fn worker_started(&self) -> usize {
        self.total_launched.fetch_add(1, Ordering::SeqCst);
        self.active_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Add a worker's drawn sleep to the running total, saturating at `u64::MAX`
    pub fn add_sleep(&self, seconds: u64) {
        // The closure always returns Some, so the update cannot fail
        let _ = self
            .total_sleep_seconds
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |total| {
                Some(total.saturating_add(seconds))
            });
    }

    /// Record a worker completion, returning the active count excluding it
    pub fn worker_finished(&self) -> usize {
        let previous = self.active_count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "worker finished without starting");
        previous - 1
    }

    /// Workers started so far
    pub fn total_launched(&self) -> usize {
        self.total_launched.load(Ordering::SeqCst)
    }

    /// Workers currently running
    pub fn active_count(&self) -> usize {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Sum of drawn sleeps so far, in seconds
    pub fn total_sleep_seconds(&self) -> u64 {
        self.total_sleep_seconds.load(Ordering::SeqCst)
    }

    /// Copy all three counters
    ///
    /// The fields are loaded one by one, so the copy is only coherent once
    /// no worker is running (after every handle has been joined).
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_launched: self.total_launched(),
            active_count: self.active_count(),
            total_sleep_seconds: self.total_sleep_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_start_zeroed() {
        let counters = SharedCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_start_and_finish() {
        let counters = SharedCounters::new();
        assert_eq!(counters.worker_started(), 1);
        assert_eq!(counters.worker_started(), 2);
        counters.add_sleep(3);
        counters.add_sleep(4);
        assert_eq!(counters.worker_finished(), 1);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total_launched, 2);
        assert_eq!(snapshot.active_count, 1);
        assert_eq!(snapshot.total_sleep_seconds, 7);
    }

    #[test]
    fn test_sleep_total_saturates() {
        let counters = SharedCounters::new();
        counters.add_sleep(u64::MAX - 1);
        counters.add_sleep(5);
        counters.add_sleep(u64::MAX);
        assert_eq!(counters.total_sleep_seconds(), u64::MAX);
    }

    #[test]
    fn test_no_lost_updates_across_threads() {
        let counters = Arc::new(SharedCounters::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        counters.worker_started();
                        counters.add_sleep(2);
                        counters.worker_finished();
                    }
                })
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total_launched, 8_000);
        assert_eq!(snapshot.active_count, 0);
        assert_eq!(snapshot.total_sleep_seconds, 16_000);
    }
}
