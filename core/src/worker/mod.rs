//! Worker module for the per-task unit of work
//!
//! A Worker is one spawned tokio task doing the whole job of a simulated
//! thread: **count in -> draw sleep -> sleep -> count out**.
//!
//! 1. Increments `total_launched` and `active_count` on the shared counters
//! 2. Draws a sleep in `[0, max_random_sleep]` seconds from a SleepSampler
//! 3. Adds the draw to `total_sleep_seconds`
//! 4. Sleeps, waking early only on a shutdown signal
//! 5. Decrements `active_count`
//!
//! # Example
//!
//! ```ignore
//! use thread_counter_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(1)
//!     .counters(counters)
//!     .sampler(sampler)
//!     .max_random_sleep(10)
//!     .build()?;
//!
//! let outcome = worker.run(shutdown_rx).await;
//! println!("Slept {}s", outcome.sleep_seconds);
//! ```

mod builder;
mod executor;
mod outcome;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use outcome::WorkerOutcome;

pub(crate) use executor::shutdown_signalled;
