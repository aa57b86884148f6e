// src/executor/bounded.rs

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::types::{ConcurrencyLimit, TaskState};

use super::in_flight::{InFlight, Outcome, Settled};
use super::report::RunReport;
use super::sink::{FailureSink, TaskFailure, TracingSink};

/// Runs a batch of independent tasks with at most `limit` in flight.
///
/// Results land in the slot matching each task's submission index. A failing
/// (or panicking) task leaves its slot at `None`, is reported to the
/// configured [`FailureSink`], and never affects any other task.
///
/// The limit is a hard ceiling: a task's thunk is not invoked until a slot in
/// the in-flight set is free.
///
/// Must be used from within a Tokio runtime.
#[derive(Clone)]
pub struct BoundedExecutor {
    limit: ConcurrencyLimit,
    sink: Arc<dyn FailureSink>,
}

impl fmt::Debug for BoundedExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedExecutor")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl BoundedExecutor {
    /// Create an executor, rejecting a limit below 1 with
    /// `TaskQueueError::InvalidArgument`.
    pub fn new(limit: usize) -> Result<Self> {
        Ok(Self::with_limit(ConcurrencyLimit::try_from(limit)?))
    }

    pub fn with_limit(limit: ConcurrencyLimit) -> Self {
        Self {
            limit,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the failure sink (defaults to [`TracingSink`]).
    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Run every task and return one entry per task, in submission order.
    ///
    /// Resolves only after every task has settled.
    pub async fn run<I, F, Fut, T, E>(&self, tasks: I) -> Vec<Option<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
    {
        self.run_with_report(tasks).await.into_results()
    }

    /// Like [`run`](Self::run), but also returns per-slot states and run
    /// statistics.
    pub async fn run_with_report<I, F, Fut, T, E>(&self, tasks: I) -> RunReport<T>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
    {
        let started = Instant::now();
        let tasks: Vec<F> = tasks.into_iter().collect();
        let total = tasks.len();
        let limit = self.limit.get();

        let mut run = RunState::new(total);
        let mut in_flight = InFlight::new();

        info!(tasks = total, limit, "bounded run started");

        for (index, task) in tasks.into_iter().enumerate() {
            if in_flight.len() >= limit {
                // Full: free exactly one slot before starting the next task.
                if let Some(settled) = in_flight.next_settled().await {
                    run.settle(settled, self.sink.as_ref());
                }
            }

            debug!(index, in_flight = in_flight.len(), "dispatching task");
            in_flight.dispatch(index, task);
            run.states[index] = TaskState::Running;
            run.peak_in_flight = run.peak_in_flight.max(in_flight.len());
        }

        while let Some(settled) = in_flight.next_settled().await {
            run.settle(settled, self.sink.as_ref());
        }

        let report = run.finish(started);
        info!(
            tasks = total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            peak_in_flight = report.peak_in_flight,
            elapsed = ?report.elapsed,
            "bounded run finished"
        );
        report
    }
}

/// Result slots and per-task states, owned by the coordinator for one run.
struct RunState<T> {
    slots: Vec<Option<T>>,
    states: Vec<TaskState>,
    peak_in_flight: usize,
}

impl<T> RunState<T> {
    fn new(total: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(total).collect(),
            states: vec![TaskState::Pending; total],
            peak_in_flight: 0,
        }
    }

    fn settle(&mut self, settled: Settled<T>, sink: &dyn FailureSink) {
        let Settled { index, outcome } = settled;
        match outcome {
            Outcome::Succeeded(value) => {
                debug!(index, "task succeeded");
                self.slots[index] = Some(value);
                self.states[index] = TaskState::Succeeded;
            }
            Outcome::Failed { kind, detail } => {
                self.states[index] = TaskState::Failed;
                report_failure(sink, &TaskFailure { index, kind, detail });
            }
        }
    }

    fn finish(self, started: Instant) -> RunReport<T> {
        RunReport {
            results: self.slots,
            states: self.states,
            peak_in_flight: self.peak_in_flight,
            elapsed: started.elapsed(),
        }
    }
}

/// Hand a failure to the sink; a panicking sink is logged and otherwise ignored.
fn report_failure(sink: &dyn FailureSink, failure: &TaskFailure) {
    if panic::catch_unwind(AssertUnwindSafe(|| sink.report(failure))).is_err() {
        warn!(index = failure.index, "failure sink panicked while reporting; report dropped");
    }
}

/// Validate `concurrency_limit`, then run `tasks` on a default executor.
///
/// The only error is `TaskQueueError::InvalidArgument`, returned before any
/// task is started. Individual task failures show up as `None` slots.
pub async fn run<I, F, Fut, T, E>(tasks: I, concurrency_limit: usize) -> Result<Vec<Option<T>>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display,
{
    let executor = BoundedExecutor::new(concurrency_limit)?;
    Ok(executor.run(tasks).await)
}
