// tests/executor_failures.rs

use std::sync::Arc;
use std::time::Duration;

use taskqueue::types::TaskState;
use taskqueue::{BoundedExecutor, ChannelSink, FailureKind, FailureSink, TaskFailure};
use taskqueue_test_utils::probe::Probe;
use taskqueue_test_utils::recording_sink::RecordingSink;
use taskqueue_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test]
async fn failure_leaves_an_empty_slot_and_others_complete() {
    init_tracing();
    let sink = RecordingSink::new();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(1), Ok("x".to_string())),
        probe.task(1, ms(1), Err("boom".to_string())),
        probe.task(2, ms(1), Ok("z".to_string())),
    ];

    let executor = BoundedExecutor::new(1)
        .unwrap()
        .with_sink(Arc::new(sink.clone()));
    let results = with_timeout(executor.run(tasks)).await;

    assert_eq!(results, vec![Some("x".to_string()), None, Some("z".to_string())]);

    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].kind, FailureKind::Error);
    assert_eq!(failures[0].detail, "boom");
}

#[tokio::test]
async fn panicking_task_is_isolated() {
    init_tracing();
    let sink = RecordingSink::new();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(5), Ok(1u8)),
        probe.panicking_task(1, ms(1)),
        probe.task(2, ms(5), Ok(3)),
    ];

    let executor = BoundedExecutor::new(2)
        .unwrap()
        .with_sink(Arc::new(sink.clone()));
    let report = with_timeout(executor.run_with_report(tasks)).await;

    assert_eq!(report.results, vec![Some(1), None, Some(3)]);
    assert_eq!(report.failed(), 1);
    assert_eq!(probe.running(), 0);

    let failures = sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Panicked);
    assert!(failures[0].detail.contains("probe task 1 panicked"));
}

#[tokio::test]
async fn every_failure_is_reported_with_its_index() {
    init_tracing();
    let sink = RecordingSink::new();
    let probe = Probe::new();
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let result = if i % 3 == 0 { Err(format!("fail {i}")) } else { Ok(i) };
            probe.task(i, ms((8 - i) as u64), result)
        })
        .collect();

    let executor = BoundedExecutor::new(3)
        .unwrap()
        .with_sink(Arc::new(sink.clone()));
    let results = with_timeout(executor.run(tasks)).await;

    assert_eq!(
        results,
        vec![None, Some(1), Some(2), None, Some(4), Some(5), None, Some(7)]
    );
    assert_eq!(sink.indices(), vec![0, 3, 6]);
    for failure in sink.failures() {
        assert_eq!(failure.detail, format!("fail {}", failure.index));
    }
}

#[tokio::test]
async fn all_tasks_failing_still_resolves() {
    init_tracing();
    let probe = Probe::new();
    let tasks: Vec<_> = (0..4)
        .map(|i| probe.task::<u8>(i, ms(1), Err("nope".to_string())))
        .collect();

    let results = with_timeout(taskqueue::run(tasks, 2)).await.unwrap();

    assert_eq!(results, vec![None, None, None, None]);
}

#[tokio::test]
async fn closed_channel_sink_does_not_affect_the_run() {
    init_tracing();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(1), Err("lost".to_string())),
        probe.task(1, ms(1), Ok(2u8)),
        probe.task(2, ms(1), Err("lost too".to_string())),
    ];

    let executor = BoundedExecutor::new(2)
        .unwrap()
        .with_sink(Arc::new(ChannelSink::new(tx)));
    let results = with_timeout(executor.run(tasks)).await;

    assert_eq!(results, vec![None, Some(2), None]);
}

#[tokio::test]
async fn channel_sink_delivers_failures_to_consumer() {
    init_tracing();
    let (tx, mut rx) = mpsc::channel(8);

    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(1), Ok(0u8)),
        probe.task(1, ms(1), Err("broken".to_string())),
    ];

    let executor = BoundedExecutor::new(2)
        .unwrap()
        .with_sink(Arc::new(ChannelSink::new(tx)));
    with_timeout(executor.run(tasks)).await;

    let failure = rx.recv().await.unwrap();
    assert_eq!(failure.index, 1);
    assert_eq!(failure.detail, "broken");
}

struct PanickingSink;

impl FailureSink for PanickingSink {
    fn report(&self, _failure: &TaskFailure) {
        panic!("sink unavailable");
    }
}

#[tokio::test]
async fn panicking_sink_does_not_abort_the_run() {
    init_tracing();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(1), Err("boom".to_string())),
        probe.task(1, ms(1), Ok(2u8)),
    ];

    let executor = BoundedExecutor::new(1)
        .unwrap()
        .with_sink(Arc::new(PanickingSink));
    let handle = tokio::spawn(async move { executor.run_with_report(tasks).await });
    let report = with_timeout(handle).await.unwrap();

    assert_eq!(report.results, vec![None, Some(2)]);
    assert_eq!(report.states, vec![TaskState::Failed, TaskState::Succeeded]);
    assert_eq!(probe.finished().len(), 2);
}

#[tokio::test]
async fn full_channel_sink_without_consumer_does_not_stall_admission() {
    init_tracing();
    // Capacity 1 and nobody receiving: every report after the first is dropped.
    let (tx, _rx) = mpsc::channel(1);

    let probe = Probe::new();
    let tasks: Vec<_> = (0..20)
        .map(|i| probe.task::<u8>(i, ms(1), Err(format!("fail {i}"))))
        .collect();

    let executor = BoundedExecutor::new(4)
        .unwrap()
        .with_sink(Arc::new(ChannelSink::new(tx)));
    let report = with_timeout(executor.run_with_report(tasks)).await;

    assert_eq!(report.failed(), 20);
    assert!(report.results.iter().all(Option::is_none));
}
