//! Sleep samplers for thread-counter workers
//!
//! This crate provides implementations of the `SleepSampler` trait:
//!
//! - Uniform sampling from the thread-local RNG
//! - Seeded uniform sampling for reproducible runs
//! - Fixed durations

#![warn(missing_docs)]
#![warn(clippy::all)]

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use thread_counter_core::SleepSampler;

/// Uniform draw over `[0, max_seconds]` from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformSleep;

impl UniformSleep {
    /// Create a new uniform sampler
    pub fn new() -> Self {
        Self
    }
}

impl SleepSampler for UniformSleep {
    fn name(&self) -> &str {
        "uniform"
    }

    fn sample(&self, max_seconds: u64) -> u64 {
        let mut rng = rand::thread_rng();
        Uniform::new_inclusive(0, max_seconds).sample(&mut rng)
    }
}

/// Uniform draw over `[0, max_seconds]` from a seeded RNG
///
/// The RNG sits behind a mutex held only for the draw. The sequence of values
/// is fixed by the seed; which worker receives which value still depends on
/// scheduling.
#[derive(Debug)]
pub struct SeededUniformSleep {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl SeededUniformSleep {
    /// Create a sampler from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seed this sampler was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SleepSampler for SeededUniformSleep {
    fn name(&self) -> &str {
        "seeded-uniform"
    }

    fn sample(&self, max_seconds: u64) -> u64 {
        let distribution = Uniform::new_inclusive(0, max_seconds);
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        distribution.sample(&mut *rng)
    }
}

/// Always sleeps the same number of seconds, capped at `max_seconds`
#[derive(Debug, Clone, Copy)]
pub struct FixedSleep {
    seconds: u64,
}

impl FixedSleep {
    /// Create a fixed sampler
    pub fn new(seconds: u64) -> Self {
        Self { seconds }
    }
}

impl SleepSampler for FixedSleep {
    fn name(&self) -> &str {
        "fixed"
    }

    fn sample(&self, max_seconds: u64) -> u64 {
        self.seconds.min(max_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uniform_sleep_in_range() {
        let sampler = UniformSleep::new();
        assert_eq!(sampler.name(), "uniform");

        for _ in 0..1_000 {
            assert!(sampler.sample(10) <= 10);
        }
    }

    #[test]
    fn test_uniform_sleep_covers_both_bounds() {
        let sampler = UniformSleep::new();
        let seen: HashSet<u64> = (0..2_000).map(|_| sampler.sample(3)).collect();

        // Inclusive range: 0 and max both reachable
        assert_eq!(seen, HashSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_uniform_sleep_zero_max() {
        let sampler = UniformSleep::new();
        for _ in 0..100 {
            assert_eq!(sampler.sample(0), 0);
        }
    }

    #[test]
    fn test_seeded_sleep_reproducible() {
        let a = SeededUniformSleep::new(7);
        let b = SeededUniformSleep::new(7);

        let first: Vec<u64> = (0..50).map(|_| a.sample(10)).collect();
        let second: Vec<u64> = (0..50).map(|_| b.sample(10)).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|&s| s <= 10));
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_seeded_sleep_differs_by_seed() {
        let a = SeededUniformSleep::new(1);
        let b = SeededUniformSleep::new(2);

        let first: Vec<u64> = (0..50).map(|_| a.sample(1_000)).collect();
        let second: Vec<u64> = (0..50).map(|_| b.sample(1_000)).collect();

        assert_ne!(first, second);
    }

    #[test]
    fn test_seeded_sleep_shared_across_threads() {
        let sampler = std::sync::Arc::new(SeededUniformSleep::new(99));
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let sampler = std::sync::Arc::clone(&sampler);
                std::thread::spawn(move || (0..250).map(|_| sampler.sample(5)).collect::<Vec<_>>())
            })
            .collect();

        let draws: Vec<u64> = threads
            .into_iter()
            .flat_map(|t| t.join().unwrap())
            .collect();

        assert_eq!(draws.len(), 1_000);
        assert!(draws.iter().all(|&s| s <= 5));
    }

    #[test]
    fn test_fixed_sleep_capped() {
        let sampler = FixedSleep::new(4);
        assert_eq!(sampler.name(), "fixed");
        assert_eq!(sampler.sample(10), 4);
        assert_eq!(sampler.sample(2), 2);
    }
}
