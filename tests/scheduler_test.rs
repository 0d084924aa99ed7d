//! Integration tests for the scheduler public API

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use proptest::prelude::*;

use tasksched::{ManualClock, ScheduledTask, TaskFile, TaskScheduler};

// =============================================================================
// Sample schedule scenario
// =============================================================================

#[test]
fn test_sample_schedule_drains_in_priority_order() {
    let scheduler = TaskScheduler::new(2).expect("valid cap");
    let now = Utc::now();
    for spec in &TaskFile::sample().tasks {
        scheduler.enqueue(spec.resolve(now));
    }
    assert_eq!(scheduler.pending_count(), 4);

    // Two tasks share priority 1; either may come first, but the first
    // dequeue must be one of them.
    let first = scheduler.dequeue().expect("non-empty queue");
    assert_eq!(first.priority, 1);
    assert!(["index_documents", "vacuum_database"].contains(&first.name.as_str()));

    let mut rest = Vec::new();
    while let Some(task) = scheduler.dequeue() {
        rest.push(task);
    }
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(rest.len(), 3);

    let priorities: Vec<_> = rest.iter().map(|t| t.priority).collect();
    assert_eq!(priorities, [1, 2, 3]);
}

#[test]
fn test_drive_loop_completes_everything() {
    let scheduler = TaskScheduler::new(2).expect("valid cap");
    let now = Utc::now();
    for spec in &TaskFile::sample().tasks {
        scheduler.enqueue(spec.resolve(now));
    }

    while scheduler.process_next() {}

    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.completed_count(), 4);
    assert_eq!(scheduler.running_count(), 0);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_threads_overlap_only_up_to_cap() {
    let cap = 2;
    let scheduler = Arc::new(TaskScheduler::new(cap).expect("valid cap"));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let observed_max = Arc::new(AtomicUsize::new(0));

    for i in 0..8 {
        let current = Arc::clone(&in_flight);
        let max = Arc::clone(&observed_max);
        scheduler.enqueue(ScheduledTask::with_callback(
            1,
            Utc::now() + Duration::hours(1),
            format!("task-{i}"),
            move || {
                let now_running = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now_running, Ordering::SeqCst);
                thread::sleep(StdDuration::from_millis(20));
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            },
        ));
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sched = Arc::clone(&scheduler);
            thread::spawn(move || {
                while sched.pending_count() > 0 {
                    if !sched.process_next() {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    assert_eq!(scheduler.completed_count(), 8);
    assert_eq!(scheduler.running_count(), 0);
    assert!(observed_max.load(Ordering::SeqCst) <= cap);
    assert!(scheduler.stats().peak_concurrent <= cap);
}

#[test]
fn test_overdue_reads_race_free_with_enqueue() {
    let start = Utc::now();
    let clock = Arc::new(ManualClock::new(start));
    let scheduler = Arc::new(TaskScheduler::with_clock(4, Arc::clone(&clock)).expect("valid cap"));
    clock.advance(Duration::hours(1));

    let writer = {
        let sched = Arc::clone(&scheduler);
        thread::spawn(move || {
            for i in 0..200 {
                sched.enqueue(ScheduledTask::new(i % 5, start, format!("w-{i}")));
            }
        })
    };

    // Every enqueued task is already overdue; snapshots must never observe
    // a torn heap, just some prefix of the writes.
    let reader = {
        let sched = Arc::clone(&scheduler);
        thread::spawn(move || {
            for _ in 0..50 {
                let overdue = sched.overdue_tasks();
                assert!(overdue.len() <= 200);
            }
        })
    };

    writer.join().expect("writer panicked");
    reader.join().expect("reader panicked");
    assert_eq!(scheduler.overdue_tasks().len(), 200);
}

// =============================================================================
// Ordering properties
// =============================================================================

proptest! {
    #[test]
    fn prop_dequeue_order_is_non_decreasing(priorities in proptest::collection::vec(-1000i32..1000, 0..64)) {
        let scheduler = TaskScheduler::new(4).expect("valid cap");
        let deadline = Utc::now() + Duration::hours(1);
        for (i, priority) in priorities.iter().enumerate() {
            scheduler.enqueue(ScheduledTask::new(*priority, deadline, format!("t-{i}")));
        }

        let mut last = i32::MIN;
        let mut drained = 0;
        while let Some(task) = scheduler.dequeue() {
            prop_assert!(task.priority >= last);
            last = task.priority;
            drained += 1;
        }
        prop_assert_eq!(drained, priorities.len());
        prop_assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn prop_equal_priorities_stay_fifo(count in 1usize..32) {
        let scheduler = TaskScheduler::new(4).expect("valid cap");
        let deadline = Utc::now() + Duration::hours(1);
        for i in 0..count {
            scheduler.enqueue(ScheduledTask::new(7, deadline, format!("t-{i}")));
        }

        for i in 0..count {
            let task = scheduler.dequeue().expect("queue drained early");
            prop_assert_eq!(task.name, format!("t-{i}"));
        }
    }
}
