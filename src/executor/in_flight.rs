// src/executor/in_flight.rs

//! The set of currently running tasks.
//!
//! Backed by a `tokio::task::JoinSet`, so "wait for whichever task settles
//! first" is a real race over every handle rather than a poll in submission
//! order. Each spawned task is keyed by its Tokio task id so the submission
//! index can be recovered even when the body panics.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use tokio::task::{Id, JoinError, JoinSet};
use tracing::warn;

use super::sink::FailureKind;

/// Terminal outcome of one task.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Succeeded(T),
    Failed { kind: FailureKind, detail: String },
}

/// A task that just left the in-flight set.
#[derive(Debug)]
pub(crate) struct Settled<T> {
    pub index: usize,
    pub outcome: Outcome<T>,
}

pub(crate) struct InFlight<T> {
    set: JoinSet<Result<T, String>>,
    indices: HashMap<Id, usize>,
}

impl<T> fmt::Debug for InFlight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("len", &self.set.len())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> InFlight<T> {
    pub fn new() -> Self {
        Self {
            set: JoinSet::new(),
            indices: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Start the task for `index`.
    ///
    /// The thunk itself is only invoked inside the spawned Tokio task, so
    /// nothing of the task runs before this call.
    pub fn dispatch<F, Fut, E>(&mut self, index: usize, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display,
    {
        let handle = self
            .set
            .spawn(async move { task().await.map_err(|err| err.to_string()) });
        self.indices.insert(handle.id(), index);
    }

    /// Wait for the first in-flight task to settle, by real completion order.
    ///
    /// Returns `None` once the set is empty.
    pub async fn next_settled(&mut self) -> Option<Settled<T>> {
        loop {
            let (id, outcome) = match self.set.join_next_with_id().await? {
                Ok((id, Ok(value))) => (id, Outcome::Succeeded(value)),
                Ok((id, Err(detail))) => (
                    id,
                    Outcome::Failed {
                        kind: FailureKind::Error,
                        detail,
                    },
                ),
                Err(err) => (err.id(), failed_join(err)),
            };

            match self.indices.remove(&id) {
                Some(index) => return Some(Settled { index, outcome }),
                None => warn!(task_id = %id, "settled task has no submission index; ignoring"),
            }
        }
    }
}

fn failed_join<T>(err: JoinError) -> Outcome<T> {
    if err.is_panic() {
        Outcome::Failed {
            kind: FailureKind::Panicked,
            detail: panic_message(err.into_panic()),
        }
    } else {
        Outcome::Failed {
            kind: FailureKind::Cancelled,
            detail: err.to_string(),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
