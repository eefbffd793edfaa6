//! Core traits shared with the sampler implementations
//!
//! Defined in core to avoid circular dependencies. Implementations live in
//! the samplers crate.

// ============================================================================
// Sleep Sampler Trait
// ============================================================================

/// Draws how long a worker sleeps
///
/// Implementations must be safe to call from many workers at once and must
/// always return a value in the inclusive range `[0, max_seconds]`.
pub trait SleepSampler: Send + Sync {
    /// Sampler name for identification
    fn name(&self) -> &str;

    /// Draw a sleep duration in whole seconds, within `[0, max_seconds]`
    fn sample(&self, max_seconds: u64) -> u64;
}
