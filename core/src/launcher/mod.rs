//! Launcher for the spawn/join lifecycle
//!
//! The Launcher drives one complete run:
//! - Spawning one worker task per worker id, optionally pacing the spawns
//! - Joining every worker before anything is read for the report
//! - Managing graceful shutdown via a broadcast channel
//! - Building the final report from the shared counters
//!
//! # Example
//!
//! ```ignore
//! use thread_counter_core::{LaunchConfig, LauncherBuilder};
//!
//! let (launcher, events_rx) = LauncherBuilder::new()
//!     .config(LaunchConfig::new(100).with_max_random_sleep(1))
//!     .sampler(sampler)
//!     .build()?;
//!
//! let report = launcher.run_with_signal_handling().await?;
//! assert_eq!(report.final_active_count, 0);
//! ```

mod builder;
mod executor;
mod report;

pub use builder::LauncherBuilder;
pub use executor::Launcher;
pub use report::{Report, SpawnPhase};
