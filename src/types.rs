use std::fmt;
use std::num::NonZeroUsize;

use crate::errors::TaskQueueError;

/// Maximum number of tasks allowed in flight at once.
///
/// Always at least 1. Construct it with `TryFrom` from either a `usize`
/// (library callers) or an `i64` (config files and the CLI, where a negative
/// value is representable and has to be rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = TaskQueueError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value).map(Self).ok_or_else(|| {
            TaskQueueError::InvalidArgument(
                "concurrency limit must be greater than 0 (got 0)".to_string(),
            )
        })
    }
}

impl TryFrom<i64> for ConcurrencyLimit {
    type Error = TaskQueueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 1 {
            return Err(TaskQueueError::InvalidArgument(format!(
                "concurrency limit must be greater than 0 (got {value})"
            )));
        }
        let value = usize::try_from(value).map_err(|_| {
            TaskQueueError::InvalidArgument(format!(
                "concurrency limit {value} does not fit in usize"
            ))
        })?;
        Self::try_from(value)
    }
}

/// Lifecycle of a single submitted task.
///
/// `Pending -> Running -> {Succeeded, Failed}`. There is no transition out of
/// `Running` other than settling, and both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}
