// src/config/mod.rs

//! Configuration for the `taskqueue` binary.
//!
//! - [`model`] defines the TOML structure.
//! - [`loader`] reads a file and turns it into a validated [`ConfigFile`].
//! - [`validate`] holds the semantic checks applied on top of deserialization.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_PATH, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
