//! Priority/deadline task scheduler
//!
//! A min-heap of pending tasks ordered by priority, a concurrency cap
//! enforced by admission control, and a completed list in finish order.

mod config;
mod core;
mod error;
mod task;

pub use config::SchedulerConfig;
pub use core::TaskScheduler;
pub use error::SchedulerError;
pub use task::{ScheduledTask, SchedulerStats, TaskCallback};
