//! Scheduler implementation

use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::task::{HeapEntry, ScheduledTask, SchedulerStats};

/// Internal state protected by mutex
struct SchedulerInner {
    /// Priority queue of pending tasks
    pending: BinaryHeap<HeapEntry>,

    /// Finished tasks, in completion order
    completed: Vec<ScheduledTask>,

    /// Tasks currently executing a callback
    running_count: usize,

    /// Next enqueue sequence number (FIFO tie-break for equal priorities)
    next_seq: u64,

    /// Statistics
    stats: SchedulerStats,
}

/// The TaskScheduler manages task execution with priority ordering,
/// deadline tracking, and a concurrency cap.
///
/// All methods take `&self`; state lives behind a mutex so the scheduler
/// can be shared across threads. The lock is released while a callback
/// runs, so callers genuinely overlap up to `max_concurrent` and a
/// callback may re-enter the scheduler (a nested [`process_next`] sees
/// the occupied slot and returns `false`).
///
/// [`process_next`]: TaskScheduler::process_next
pub struct TaskScheduler<C: Clock = SystemClock> {
    max_concurrent: usize,
    clock: C,
    inner: Mutex<SchedulerInner>,
}

impl TaskScheduler<SystemClock> {
    /// Create a scheduler with the given concurrency cap and the system
    /// clock. A cap of zero is rejected.
    pub fn new(max_concurrent: usize) -> Result<Self, SchedulerError> {
        Self::with_clock(max_concurrent, SystemClock)
    }

    /// Create a scheduler from configuration
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Self::new(config.max_concurrent)
    }
}

impl<C: Clock> TaskScheduler<C> {
    /// Create a scheduler that reads time from a custom clock
    pub fn with_clock(max_concurrent: usize, clock: C) -> Result<Self, SchedulerError> {
        debug!(max_concurrent, "TaskScheduler::with_clock: called");
        if max_concurrent == 0 {
            return Err(SchedulerError::InvalidMaxConcurrent { value: 0 });
        }
        Ok(Self {
            max_concurrent,
            clock,
            inner: Mutex::new(SchedulerInner {
                pending: BinaryHeap::new(),
                completed: Vec::new(),
                running_count: 0,
                next_seq: 0,
                stats: SchedulerStats::default(),
            }),
        })
    }

    /// The concurrency cap this scheduler was created with
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Add a task to the priority queue
    pub fn enqueue(&self, task: ScheduledTask) {
        debug!(name = %task.name, priority = task.priority, "TaskScheduler::enqueue: called");
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.pending.push(HeapEntry { task, seq });
        inner.stats.total_enqueued += 1;
        inner.stats.peak_pending = inner.stats.peak_pending.max(inner.pending.len());
    }

    /// Remove and return the most urgent pending task
    ///
    /// Lowest priority value first; equal priorities come out in enqueue
    /// order. Returns `None` on an empty queue.
    pub fn dequeue(&self) -> Option<ScheduledTask> {
        debug!("TaskScheduler::dequeue: called");
        self.lock().pending.pop().map(|entry| entry.task)
    }

    /// Process the next available task
    ///
    /// Returns `false` without dequeuing when the concurrency cap is
    /// reached or the queue is empty. Otherwise runs the task's callback
    /// (if any) to completion and moves the task to the completed list.
    ///
    /// A failing callback is logged, counted in
    /// [`SchedulerStats::total_failed`], and does not prevent completion;
    /// `process_next` still returns `true`.
    pub fn process_next(&self) -> bool {
        debug!("TaskScheduler::process_next: called");
        let task = {
            let mut inner = self.lock();

            if inner.running_count >= self.max_concurrent {
                debug!(
                    running = inner.running_count,
                    max = self.max_concurrent,
                    "TaskScheduler::process_next: at capacity, refusing"
                );
                return false;
            }

            let Some(entry) = inner.pending.pop() else {
                debug!("TaskScheduler::process_next: queue empty");
                return false;
            };

            inner.running_count += 1;
            inner.stats.peak_concurrent = inner.stats.peak_concurrent.max(inner.running_count);
            entry.task
        };

        // Lock released while the callback runs so other callers can make
        // progress and the callback itself can reach back into the scheduler.
        if let Some(callback) = &task.callback {
            debug!(name = %task.name, "TaskScheduler::process_next: invoking callback");
            if let Err(err) = callback() {
                warn!(name = %task.name, error = %err, "Task callback failed");
                self.lock().stats.total_failed += 1;
            }
        }

        let mut inner = self.lock();
        inner.running_count -= 1;
        inner.stats.total_completed += 1;
        debug!(name = %task.name, "TaskScheduler::process_next: completed");
        inner.completed.push(task);
        true
    }

    /// Number of tasks waiting in the queue
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of tasks that have finished executing
    pub fn completed_count(&self) -> usize {
        self.lock().completed.len()
    }

    /// Number of tasks currently executing
    pub fn running_count(&self) -> usize {
        self.lock().running_count
    }

    /// Return every pending task whose deadline has passed
    ///
    /// Evaluated against the scheduler's clock at call time; tasks are not
    /// removed. The snapshot is taken under the state lock.
    pub fn overdue_tasks(&self) -> Vec<ScheduledTask> {
        debug!("TaskScheduler::overdue_tasks: called");
        let now = self.clock.now();
        let inner = self.lock();
        inner
            .pending
            .iter()
            .filter(|entry| entry.task.is_overdue(now))
            .map(|entry| entry.task.clone())
            .collect()
    }

    /// Snapshot of the completed tasks, in completion order
    pub fn completed_tasks(&self) -> Vec<ScheduledTask> {
        self.lock().completed.clone()
    }

    /// Get the scheduler statistics
    pub fn stats(&self) -> SchedulerStats {
        self.lock().stats.clone()
    }

    // A panicking caller thread must not wedge the scheduler; the inner
    // state stays consistent because mutations happen in whole critical
    // sections.
    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
