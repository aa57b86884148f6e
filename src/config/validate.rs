// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskQueueError};
use crate::types::ConcurrencyLimit;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskQueueError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_tasks(&raw)?;
        validate_tasks(&raw)?;
        let limit = ConcurrencyLimit::try_from(raw.config.concurrency_limit)?;
        Ok(ConfigFile::new_unchecked(limit, raw.task))
    }
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(TaskQueueError::ConfigError(
            "config must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_tasks(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();

    for (position, task) in cfg.task.iter().enumerate() {
        if task.name.trim().is_empty() {
            return Err(TaskQueueError::ConfigError(format!(
                "task #{position} has an empty `name`"
            )));
        }
        if task.cmd.trim().is_empty() {
            return Err(TaskQueueError::ConfigError(format!(
                "task '{}' has an empty `cmd`",
                task.name
            )));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(TaskQueueError::ConfigError(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
    }

    Ok(())
}
