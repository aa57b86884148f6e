// src/executor/mod.rs

//! Bounded-concurrency task execution.
//!
//! - [`bounded`] holds the coordinator: admission against the concurrency
//!   limit, result slots and the final drain.
//! - [`in_flight`] is the race-capable set of running tasks.
//! - [`sink`] defines where task failures are reported.
//! - [`report`] is the per-run summary returned by `run_with_report`.

pub mod bounded;
pub(crate) mod in_flight;
pub mod report;
pub mod sink;

pub use bounded::{BoundedExecutor, run};
pub use report::RunReport;
pub use sink::{ChannelSink, FailureKind, FailureSink, TaskFailure, TracingSink};
