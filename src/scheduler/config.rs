//! Scheduler configuration

use serde::{Deserialize, Serialize};

use super::error::SchedulerError;

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Max concurrently executing tasks
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl SchedulerConfig {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.max_concurrent == 0 {
            return Err(SchedulerError::InvalidMaxConcurrent { value: 0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.max_concurrent, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = SchedulerConfig { max_concurrent: 0 };
        assert!(matches!(
            config.validate(),
            Err(SchedulerError::InvalidMaxConcurrent { value: 0 })
        ));
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: SchedulerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.max_concurrent, 4);
    }
}
