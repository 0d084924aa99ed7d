//! Task types for the scheduler

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Action invoked when a task executes
///
/// Shared by `Arc` so tasks stay cheaply cloneable in snapshot views.
pub type TaskCallback = Arc<dyn Fn() -> eyre::Result<()> + Send + Sync>;

/// A task with a priority and a deadline
///
/// `priority` is the only ordering key (lower value = more urgent);
/// `deadline`, `name`, and `callback` never participate in comparison.
#[derive(Clone)]
pub struct ScheduledTask {
    /// Ordering key, lower value = more urgent
    pub priority: i32,

    /// Absolute time after which the task counts as overdue
    pub deadline: DateTime<Utc>,

    /// Identifying label, not used for ordering
    pub name: String,

    /// Optional action; a task without one is a no-op marker
    pub callback: Option<TaskCallback>,
}

impl ScheduledTask {
    /// Create a task with no callback
    pub fn new(priority: i32, deadline: DateTime<Utc>, name: impl Into<String>) -> Self {
        Self {
            priority,
            deadline,
            name: name.into(),
            callback: None,
        }
    }

    /// Create a task that runs `callback` when processed
    pub fn with_callback(
        priority: i32,
        deadline: DateTime<Utc>,
        name: impl Into<String>,
        callback: impl Fn() -> eyre::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            priority,
            deadline,
            name: name.into(),
            callback: Some(Arc::new(callback)),
        }
    }

    /// Check whether the task's deadline has passed at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("priority", &self.priority)
            .field("deadline", &self.deadline)
            .field("name", &self.name)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Heap entry pairing a task with its enqueue sequence number
///
/// `BinaryHeap` is a max-heap, so the comparison is inverted: the smallest
/// priority pops first, and the earlier sequence number wins among equals
/// (FIFO tie-break).
pub(crate) struct HeapEntry {
    pub task: ScheduledTask,
    pub seq: u64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lower priority value first, then earlier enqueue
        other
            .task
            .priority
            .cmp(&self.task.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Statistics for the scheduler
#[derive(Debug, Default, Clone, Serialize)]
pub struct SchedulerStats {
    pub total_enqueued: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub peak_pending: usize,
    pub peak_concurrent: usize,
}
