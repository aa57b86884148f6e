//! Instrumented tasks for observing what the executor actually runs.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type ProbeFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A boxed task thunk, so plain and panicking probes can share one `Vec`.
pub type ProbeTask<T> = Box<dyn FnOnce() -> ProbeFuture<T> + Send>;

/// Shared enter/exit counters for a batch of probe tasks.
///
/// Every task built by [`Probe::task`] bumps `running` when its body starts
/// and drops it again when the body ends (including by panic), keeping track
/// of the highest value seen.
#[derive(Clone, Default)]
pub struct Probe {
    inner: Arc<ProbeInner>,
}

#[derive(Default)]
struct ProbeInner {
    running: AtomicUsize,
    peak: AtomicUsize,
    started: Mutex<Vec<usize>>,
    finished: Mutex<Vec<usize>>,
}

struct RunningGuard {
    inner: Arc<ProbeInner>,
    index: usize,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.inner.running.fetch_sub(1, Ordering::SeqCst);
        self.inner.finished.lock().unwrap().push(self.index);
    }
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a task that sleeps for `delay`, then yields `result`.
    pub fn task<T>(
        &self,
        index: usize,
        delay: Duration,
        result: Result<T, String>,
    ) -> ProbeTask<T>
    where
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::new(move || -> ProbeFuture<T> {
            Box::pin(async move {
                let _guard = enter(inner, index);
                tokio::time::sleep(delay).await;
                result
            })
        })
    }

    /// Build a task that sleeps for `delay`, then panics.
    pub fn panicking_task<T>(
        &self,
        index: usize,
        delay: Duration,
    ) -> ProbeTask<T>
    where
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::new(move || -> ProbeFuture<T> { Box::pin(panic_after(inner, index, delay)) })
    }

    /// Highest number of task bodies observed running at the same time.
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    pub fn running(&self) -> usize {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Submission indices in the order their bodies started.
    pub fn started(&self) -> Vec<usize> {
        self.inner.started.lock().unwrap().clone()
    }

    /// Submission indices in the order their bodies ended.
    pub fn finished(&self) -> Vec<usize> {
        self.inner.finished.lock().unwrap().clone()
    }
}

fn enter(inner: Arc<ProbeInner>, index: usize) -> RunningGuard {
    let now = inner.running.fetch_add(1, Ordering::SeqCst) + 1;
    inner.peak.fetch_max(now, Ordering::SeqCst);
    inner.started.lock().unwrap().push(index);
    RunningGuard { inner, index }
}

async fn panic_after<T>(inner: Arc<ProbeInner>, index: usize, delay: Duration) -> Result<T, String> {
    let _guard = enter(inner, index);
    tokio::time::sleep(delay).await;
    panic!("probe task {index} panicked")
}
