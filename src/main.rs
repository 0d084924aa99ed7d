//! tsched - priority/deadline task scheduler
//!
//! CLI entry point: load a schedule, report pending/overdue state, and
//! drain the queue in priority order.

use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Parser;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::info;

use tasksched::cli::{Cli, Command, OutputFormat};
use tasksched::config::{Config, TaskFile};
use tasksched::scheduler::{ScheduledTask, SchedulerStats, TaskScheduler};

fn setup_logging(verbose: bool) -> Result<()> {
    // Results go to stdout; keep diagnostics on stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(max_concurrent = config.scheduler.max_concurrent, "tsched loaded config");

    match cli.command {
        Some(Command::Run { tasks, format }) => cmd_run(&config, tasks.as_deref(), format),
        Some(Command::Overdue { tasks, format }) => cmd_overdue(&config, tasks.as_deref(), format),
        None => cmd_run(&config, None, OutputFormat::Text),
    }
}

/// Overdue task entry in command output
#[derive(Serialize)]
struct OverdueEntry {
    name: String,
    priority: i32,
    deadline: DateTime<Utc>,
}

impl From<&ScheduledTask> for OverdueEntry {
    fn from(task: &ScheduledTask) -> Self {
        Self {
            name: task.name.clone(),
            priority: task.priority,
            deadline: task.deadline,
        }
    }
}

/// Summary of a `run` invocation
#[derive(Serialize)]
struct RunSummary {
    pending_before: usize,
    completed: usize,
    overdue: Vec<OverdueEntry>,
    stats: SchedulerStats,
}

fn load_schedule(config: &Config, tasks: Option<&Path>) -> Result<TaskScheduler> {
    let file = match tasks {
        Some(path) => TaskFile::load(path)?,
        None => TaskFile::sample(),
    };

    let scheduler = TaskScheduler::from_config(&config.scheduler)?;
    let now = Utc::now();
    for spec in &file.tasks {
        scheduler.enqueue(spec.resolve(now));
    }

    info!(pending = scheduler.pending_count(), "Schedule loaded");
    Ok(scheduler)
}

fn cmd_run(config: &Config, tasks: Option<&Path>, format: OutputFormat) -> Result<()> {
    let scheduler = load_schedule(config, tasks)?;
    let pending_before = scheduler.pending_count();
    let overdue = scheduler.overdue_tasks();

    match format {
        OutputFormat::Text => {
            println!("Pending tasks: {pending_before}");
            if !overdue.is_empty() {
                println!("Overdue tasks: {}", overdue.len());
                for task in &overdue {
                    println!("  {} (priority {}, due {})", task.name, task.priority, task.deadline);
                }
            }

            while scheduler.process_next() {
                println!("Completed: {}", scheduler.completed_count());
            }

            let stats = scheduler.stats();
            println!("Done: {} completed, {} failed", stats.total_completed, stats.total_failed);
        }
        OutputFormat::Json => {
            while scheduler.process_next() {}

            let summary = RunSummary {
                pending_before,
                completed: scheduler.completed_count(),
                overdue: overdue.iter().map(OverdueEntry::from).collect(),
                stats: scheduler.stats(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn cmd_overdue(config: &Config, tasks: Option<&Path>, format: OutputFormat) -> Result<()> {
    let scheduler = load_schedule(config, tasks)?;
    let overdue: Vec<OverdueEntry> = scheduler.overdue_tasks().iter().map(OverdueEntry::from).collect();

    match format {
        OutputFormat::Text => {
            println!("Overdue tasks: {}", overdue.len());
            for entry in &overdue {
                println!("  {} (priority {}, due {})", entry.name, entry.priority, entry.deadline);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&overdue)?);
        }
    }

    Ok(())
}
