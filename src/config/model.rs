// src/config/model.rs

use serde::Deserialize;

use crate::types::ConcurrencyLimit;

/// Configuration as read from TOML, before validation.
///
/// ```toml
/// [config]
/// concurrency_limit = 2
///
/// [[task]]
/// name = "lint"
/// cmd = "cargo clippy"
///
/// [[task]]
/// name = "test"
/// cmd = "cargo test"
/// ```
///
/// Tasks are an array of tables so their order in the file is their
/// submission order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of commands running at once.
    ///
    /// Signed so that a negative value in the file is reported as an invalid
    /// limit rather than a TOML type error.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: i64,
}

fn default_concurrency_limit() -> i64 {
    4
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
        }
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    pub cmd: String,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see
/// [`crate::config::validate`]), so holders can rely on a positive limit and
/// a non-empty task list with unique names.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub concurrency_limit: ConcurrencyLimit,
    pub tasks: Vec<TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(concurrency_limit: ConcurrencyLimit, tasks: Vec<TaskConfig>) -> Self {
        Self {
            concurrency_limit,
            tasks,
        }
    }

    /// Same tasks, different limit (used for the `--concurrency` override).
    pub fn with_concurrency_limit(mut self, limit: ConcurrencyLimit) -> Self {
        self.concurrency_limit = limit;
        self
    }
}
