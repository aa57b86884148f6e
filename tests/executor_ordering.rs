// tests/executor_ordering.rs

use std::time::Duration;

use taskqueue::BoundedExecutor;
use taskqueue::types::TaskState;
use taskqueue_test_utils::probe::Probe;
use taskqueue_test_utils::{init_tracing, with_timeout};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test]
async fn results_follow_submission_order_not_completion_order() {
    init_tracing();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(60), Ok("A")),
        probe.task(1, ms(10), Ok("B")),
        probe.task(2, ms(30), Ok("C")),
    ];

    let results = with_timeout(taskqueue::run(tasks, 3)).await.unwrap();

    assert_eq!(results, vec![Some("A"), Some("B"), Some("C")]);
    // B really did finish first.
    assert_eq!(probe.finished(), vec![1, 2, 0]);
}

#[tokio::test]
async fn empty_input_yields_empty_output() {
    init_tracing();
    let tasks: Vec<fn() -> std::future::Ready<Result<u8, String>>> = Vec::new();

    let results = with_timeout(taskqueue::run(tasks, 4)).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn run_waits_for_the_last_dispatched_task() {
    init_tracing();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(5), Ok(0u32)),
        probe.task(1, ms(5), Ok(1)),
        probe.task(2, ms(80), Ok(2)),
    ];

    let executor = BoundedExecutor::new(2).unwrap();
    let results = with_timeout(executor.run(tasks)).await;

    assert_eq!(results, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(probe.running(), 0);
    assert_eq!(probe.finished().len(), 3);
}

#[tokio::test]
async fn each_task_is_dispatched_exactly_once() {
    init_tracing();
    let probe = Probe::new();
    let tasks: Vec<_> = (0..12)
        .map(|i| probe.task(i, ms((i as u64 * 7) % 20), Ok(i)))
        .collect();

    let executor = BoundedExecutor::new(3).unwrap();
    let results = with_timeout(executor.run(tasks)).await;

    let mut started = probe.started();
    started.sort_unstable();
    assert_eq!(started, (0..12).collect::<Vec<_>>());
    assert_eq!(results, (0..12).map(Some).collect::<Vec<_>>());
}

#[tokio::test]
async fn report_records_terminal_state_per_slot() {
    init_tracing();
    let probe = Probe::new();
    let tasks = vec![
        probe.task(0, ms(5), Ok(10)),
        probe.task(1, ms(1), Err("nope".to_string())),
        probe.task(2, ms(2), Ok(30)),
    ];

    let executor = BoundedExecutor::new(2).unwrap();
    let report = with_timeout(executor.run_with_report(tasks)).await;

    assert_eq!(report.results, vec![Some(10), None, Some(30)]);
    assert_eq!(
        report.states,
        vec![TaskState::Succeeded, TaskState::Failed, TaskState::Succeeded]
    );
    assert!(report.states.iter().all(|s| s.is_terminal()));
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.peak_in_flight, 2);
}
