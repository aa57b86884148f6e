use std::sync::{Arc, Mutex};

use taskqueue::{FailureSink, TaskFailure};

/// A failure sink that keeps every report for later assertions.
#[derive(Clone, Default)]
pub struct RecordingSink {
    failures: Arc<Mutex<Vec<TaskFailure>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<TaskFailure> {
        self.failures.lock().unwrap().clone()
    }

    /// Reported submission indices, sorted.
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.failures().iter().map(|f| f.index).collect();
        indices.sort_unstable();
        indices
    }
}

impl FailureSink for RecordingSink {
    fn report(&self, failure: &TaskFailure) {
        self.failures.lock().unwrap().push(failure.clone());
    }
}
