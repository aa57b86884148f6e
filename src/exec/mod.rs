// src/exec/mod.rs

//! Shell command tasks for the `taskqueue` binary.
//!
//! Each configured `[[task]]` becomes one deferred unit of work for the
//! bounded executor; [`command`] runs it with `tokio::process::Command`.

pub mod command;

pub use command::run_command;
