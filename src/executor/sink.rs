// src/executor/sink.rs

//! Observability collaborator for task failures.
//!
//! The executor hands every failed task to a [`FailureSink`]. Reporting is a
//! one-way notification: `report` returns nothing, must not block, and the
//! executor never looks at what the sink did with the failure.
//!
//! - [`TracingSink`] is the default and logs via `tracing::error!`.
//! - [`ChannelSink`] forwards failures over a bounded mpsc channel and drops
//!   them when the channel is full or closed.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, error};

/// Why a task ended up in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The task's future resolved to `Err`.
    Error,
    /// The task body panicked.
    Panicked,
    /// The task was aborted before settling (runtime shutting down).
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Error => "error",
            FailureKind::Panicked => "panicked",
            FailureKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A single failed task, keyed by its submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub index: usize,
    pub kind: FailureKind,
    pub detail: String,
}

/// Receives failure reports from the executor.
///
/// `report` runs on the coordinator between admissions, so it must return
/// promptly: hand slow work off (see [`ChannelSink`]) instead of doing it
/// inline. A panic inside `report` is caught and logged; it never reaches
/// the run.
pub trait FailureSink: Send + Sync {
    fn report(&self, failure: &TaskFailure);
}

/// Default sink: one `error` event per failed task.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn report(&self, failure: &TaskFailure) {
        error!(
            index = failure.index,
            kind = %failure.kind,
            error = %failure.detail,
            "error executing task"
        );
    }
}

/// Forwards failures to an async consumer.
///
/// Uses `try_send`, so a slow or gone consumer never holds up the run; the
/// report is dropped instead.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<TaskFailure>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<TaskFailure>) -> Self {
        Self { tx }
    }
}

impl FailureSink for ChannelSink {
    fn report(&self, failure: &TaskFailure) {
        if let Err(err) = self.tx.try_send(failure.clone()) {
            debug!(
                index = failure.index,
                error = %err,
                "failure report dropped by channel sink"
            );
        }
    }
}
