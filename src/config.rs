//! Configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scheduler::{ScheduledTask, SchedulerConfig};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheduler limits
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tasksched.yml
        let local_config = PathBuf::from(".tasksched.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tasksched/tasksched.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tasksched").join("tasksched.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&contents).context(format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

/// A schedule of tasks loaded from a YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFile {
    pub tasks: Vec<TaskSpec>,
}

/// One task entry in a task file
///
/// The deadline is either absolute (`deadline`, RFC 3339) or relative
/// (`due_in_secs` from load time). A relative offset may be negative to
/// describe an already-overdue task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,

    /// Lower value = more urgent
    #[serde(default)]
    pub priority: i32,

    /// Absolute deadline; takes precedence over `due_in_secs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    /// Seconds from load time, used when `deadline` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_in_secs: Option<i64>,
}

/// Fallback deadline offset when a spec gives neither form
const DEFAULT_DUE_IN_SECS: i64 = 3600;

impl TaskSpec {
    /// Turn the spec into a schedulable task, resolving a relative
    /// deadline against `now`
    pub fn resolve(&self, now: DateTime<Utc>) -> ScheduledTask {
        let deadline = self
            .deadline
            .unwrap_or_else(|| now + Duration::seconds(self.due_in_secs.unwrap_or(DEFAULT_DUE_IN_SECS)));
        ScheduledTask::new(self.priority, deadline, self.name.clone())
    }
}

impl TaskFile {
    /// Load a task file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read tasks from {}", path.display()))?;
        let file: Self = serde_yaml::from_str(&contents)
            .context(format!("Failed to parse tasks from {}", path.display()))?;
        Ok(file)
    }

    /// The built-in sample schedule: four index-maintenance tasks with
    /// mixed priorities and deadlines
    pub fn sample() -> Self {
        Self {
            tasks: vec![
                TaskSpec {
                    name: "index_documents".to_string(),
                    priority: 1,
                    deadline: None,
                    due_in_secs: Some(3600),
                },
                TaskSpec {
                    name: "optimize_fts5".to_string(),
                    priority: 3,
                    deadline: None,
                    due_in_secs: Some(7200),
                },
                TaskSpec {
                    name: "extract_metadata".to_string(),
                    priority: 2,
                    deadline: None,
                    due_in_secs: Some(1800),
                },
                TaskSpec {
                    name: "vacuum_database".to_string(),
                    priority: 1,
                    deadline: None,
                    due_in_secs: Some(14400),
                },
            ],
        }
    }
}
