//! Scheduler error types

use thiserror::Error;

/// Errors that can occur constructing or configuring a scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A zero cap would deadlock admission control, so it is rejected
    /// at construction.
    #[error("max_concurrent must be positive, got {value}")]
    InvalidMaxConcurrent { value: usize },
}
