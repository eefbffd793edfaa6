//! thread-counter-core: concurrent worker launcher with race-free accounting
//!
//! This crate provides the pieces the thread-counter binary is built from,
//! including:
//!
//! - Launch configuration and verbosity levels
//! - Shared atomic counters updated by every worker
//! - The SleepSampler trait used to draw worker sleeps
//! - Worker and Launcher with their builders
//! - Progress events and the final report
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod counters;
pub mod error;
pub mod event;
pub mod launcher;
pub mod traits;
pub mod worker;

pub use config::*;
pub use counters::{CounterSnapshot, SharedCounters};
pub use error::*;
pub use event::{EventSender, LaunchEvent};
pub use launcher::{Launcher, LauncherBuilder, Report, SpawnPhase};
pub use traits::*;
pub use worker::{Worker, WorkerBuilder, WorkerOutcome};
