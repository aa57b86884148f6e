#![allow(dead_code)]

use taskqueue::config::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn concurrency_limit(mut self, limit: i64) -> Self {
        self.config.config.concurrency_limit = limit;
        self
    }

    pub fn with_task(mut self, name: &str, cmd: &str) -> Self {
        self.config.task.push(TaskConfig {
            name: name.to_string(),
            cmd: cmd.to_string(),
        });
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
