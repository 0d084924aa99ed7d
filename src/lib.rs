//! tasksched - priority/deadline task scheduler
//!
//! A min-heap task scheduler with a concurrency cap and deadline
//! tracking. Tasks carry an integer priority (lower value = more urgent),
//! an absolute deadline, and an optional callback; the scheduler moves
//! them from a pending priority queue through execution into a completed
//! list, refusing to start new work once `max_concurrent` executions are
//! in flight.
//!
//! # Modules
//!
//! - [`scheduler`] - the scheduler core and its task types
//! - [`clock`] - injectable time source for deadline checks
//! - [`config`] - configuration and YAML task files
//! - [`cli`] - command-line interface

pub mod cli;
pub mod clock;
pub mod config;
pub mod scheduler;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, TaskFile, TaskSpec};
pub use scheduler::{
    ScheduledTask, SchedulerConfig, SchedulerError, SchedulerStats, TaskCallback, TaskScheduler,
};
