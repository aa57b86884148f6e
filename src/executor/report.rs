// src/executor/report.rs

use std::time::Duration;

use crate::types::TaskState;

/// Everything a bounded run produced.
///
/// `results[i]` is `Some` exactly when `states[i]` is `Succeeded`. Failure
/// causes are not kept here; they went to the executor's failure sink.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport<T> {
    pub results: Vec<Option<T>>,
    pub states: Vec<TaskState>,
    /// Largest in-flight set size observed during the run.
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

impl<T> RunReport<T> {
    pub fn succeeded(&self) -> usize {
        self.count(TaskState::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(TaskState::Failed)
    }

    pub fn into_results(self) -> Vec<Option<T>> {
        self.results
    }

    fn count(&self, state: TaskState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }
}
