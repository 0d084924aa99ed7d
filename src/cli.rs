//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tsched - priority/deadline task scheduler
#[derive(Parser)]
#[command(
    name = "tsched",
    about = "Priority/deadline task scheduler with a concurrency cap",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Enqueue a schedule and drain it in priority order
    Run {
        /// YAML task file (defaults to the built-in sample schedule)
        #[arg(short, long)]
        tasks: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List tasks already past their deadline, without running anything
    Overdue {
        /// YAML task file (defaults to the built-in sample schedule)
        #[arg(short, long)]
        tasks: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
