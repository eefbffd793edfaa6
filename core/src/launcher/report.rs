//! Final report of a launch

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::counters::CounterSnapshot;
use crate::worker::WorkerOutcome;

/// Counters captured right after the spawn loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpawnPhase {
    /// Worker tasks handed to the runtime
    pub spawned: usize,

    /// Workers that had already started when the loop ended
    pub launched: usize,

    /// Workers still running when the loop ended
    pub active: usize,

    /// Time spent in the spawn loop
    pub elapsed: Duration,
}

/// Totals for a finished launch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Wall clock time the launch started
    pub started_at: DateTime<Utc>,

    /// Workers that ran
    pub total_launched: usize,

    /// Workers still active after the join; always 0 for a finished launch
    pub final_active_count: usize,

    /// Total wall time of the launch
    pub elapsed: Duration,

    /// Snapshot taken after the spawn loop
    pub spawn_phase: SpawnPhase,

    /// Sum of every worker's drawn sleep, in seconds
    pub total_sleep_seconds: u64,

    /// `total_sleep_seconds / total_launched`, 0 when nothing ran
    pub average_sleep_seconds: f64,

    /// Workers whose sleep was cut short by a shutdown
    pub interrupted_workers: usize,

    /// Whether a shutdown stopped spawning or interrupted any worker
    pub cancelled: bool,
}

impl Report {
    /// Build a report from the counters read after every worker was joined
    pub fn new(
        started_at: DateTime<Utc>,
        counters: CounterSnapshot,
        elapsed: Duration,
        spawn_phase: SpawnPhase,
        outcomes: &[WorkerOutcome],
        spawn_cancelled: bool,
    ) -> Self {
        let drawn = outcomes
            .iter()
            .fold(0u64, |sum, o| sum.saturating_add(o.sleep_seconds));
        if drawn != counters.total_sleep_seconds {
            tracing::warn!(
                drawn,
                counted = counters.total_sleep_seconds,
                "Sleep total disagrees with worker outcomes"
            );
        }

        let interrupted_workers = outcomes.iter().filter(|o| !o.completed()).count();

        Self {
            started_at,
            total_launched: counters.total_launched,
            final_active_count: counters.active_count,
            elapsed,
            spawn_phase,
            total_sleep_seconds: counters.total_sleep_seconds,
            average_sleep_seconds: average_sleep(
                counters.total_sleep_seconds,
                counters.total_launched,
            ),
            interrupted_workers,
            cancelled: spawn_cancelled || interrupted_workers > 0,
        }
    }

    /// Total wall time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Whether every launched worker has finished
    pub fn is_balanced(&self) -> bool {
        self.final_active_count == 0
    }
}

/// Mean sleep per worker, guarded against an empty launch
pub fn average_sleep(total_sleep_seconds: u64, total_launched: usize) -> f64 {
    if total_launched == 0 {
        0.0
    } else {
        total_sleep_seconds as f64 / total_launched as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(worker_id: usize, sleep_seconds: u64, interrupted: bool) -> WorkerOutcome {
        WorkerOutcome {
            worker_id,
            sleep_seconds,
            elapsed: Duration::from_secs(sleep_seconds),
            interrupted,
        }
    }

    #[test]
    fn test_average_sleep() {
        assert!((average_sleep(10, 4) - 2.5).abs() < f64::EPSILON);
        assert_eq!(average_sleep(0, 5), 0.0);
    }

    #[test]
    fn test_average_sleep_zero_launched() {
        assert_eq!(average_sleep(0, 0), 0.0);
        assert_eq!(average_sleep(12, 0), 0.0);
    }

    #[test]
    fn test_report_from_counters() {
        let counters = CounterSnapshot {
            total_launched: 3,
            active_count: 0,
            total_sleep_seconds: 7,
        };
        let outcomes = [outcome(1, 2, false), outcome(2, 5, true), outcome(3, 0, false)];

        let report = Report::new(
            Utc::now(),
            counters,
            Duration::from_millis(5_250),
            SpawnPhase::default(),
            &outcomes,
            false,
        );

        assert_eq!(report.total_launched, 3);
        assert_eq!(report.final_active_count, 0);
        assert!(report.is_balanced());
        assert_eq!(report.total_sleep_seconds, 7);
        assert!((report.average_sleep_seconds - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.interrupted_workers, 1);
        assert!((report.elapsed_secs() - 5.25).abs() < 1e-9);
        assert!(report.cancelled);
    }

    #[test]
    fn test_report_empty_launch() {
        let report = Report::new(
            Utc::now(),
            CounterSnapshot::default(),
            Duration::ZERO,
            SpawnPhase::default(),
            &[],
            true,
        );

        assert_eq!(report.total_launched, 0);
        assert_eq!(report.average_sleep_seconds, 0.0);
        assert!(report.cancelled);
    }

    #[test]
    fn test_report_saturated_sleep_total() {
        let counters = CounterSnapshot {
            total_launched: 2,
            active_count: 0,
            total_sleep_seconds: u64::MAX,
        };
        let outcomes = [outcome(1, u64::MAX, true), outcome(2, u64::MAX, true)];

        let report = Report::new(
            Utc::now(),
            counters,
            Duration::from_secs(1),
            SpawnPhase::default(),
            &outcomes,
            false,
        );

        assert_eq!(report.total_sleep_seconds, u64::MAX);
        assert!(report.average_sleep_seconds.is_finite());
        assert_eq!(report.interrupted_workers, 2);
    }

    #[test]
    fn test_report_json_format() {
        let report = Report::new(
            Utc::now(),
            CounterSnapshot {
                total_launched: 2,
                active_count: 0,
                total_sleep_seconds: 4,
            },
            Duration::from_secs(3),
            SpawnPhase {
                spawned: 2,
                launched: 2,
                active: 2,
                elapsed: Duration::from_millis(1),
            },
            &[outcome(1, 1, false), outcome(2, 3, false)],
            false,
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"total_launched\":2"));
        assert!(json.contains("\"average_sleep_seconds\":2.0"));
        assert!(json.contains("\"spawn_phase\":{\"spawned\":2"));
        assert!(json.contains("\"cancelled\":false"));
    }
}
