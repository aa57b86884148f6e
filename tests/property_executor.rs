// tests/property_executor.rs

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use taskqueue::BoundedExecutor;
use taskqueue_test_utils::probe::Probe;
use taskqueue_test_utils::recording_sink::RecordingSink;

// Each generated task: (delay in ms, whether it fails).
fn tasks_strategy() -> impl Strategy<Value = Vec<(u64, bool)>> {
    proptest::collection::vec((0u64..6, any::<bool>()), 0..16)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn slots_match_submission_and_peak_respects_limit(
        plans in tasks_strategy(),
        limit in 1usize..5,
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let probe = Probe::new();
        let sink = RecordingSink::new();
        let tasks: Vec<_> = plans
            .iter()
            .enumerate()
            .map(|(i, (delay, fails))| {
                let result = if *fails { Err(format!("task {i} failed")) } else { Ok(i) };
                probe.task(i, Duration::from_millis(*delay), result)
            })
            .collect();

        let executor = BoundedExecutor::new(limit)
            .unwrap()
            .with_sink(Arc::new(sink.clone()));
        let report = rt.block_on(executor.run_with_report(tasks));

        prop_assert_eq!(report.results.len(), plans.len());
        for (i, (_, fails)) in plans.iter().enumerate() {
            if *fails {
                prop_assert_eq!(report.results[i], None);
            } else {
                prop_assert_eq!(report.results[i], Some(i));
            }
        }

        prop_assert!(probe.peak() <= limit);
        prop_assert!(report.peak_in_flight <= limit);
        prop_assert_eq!(probe.running(), 0);

        let mut started = probe.started();
        started.sort_unstable();
        prop_assert_eq!(started, (0..plans.len()).collect::<Vec<_>>());

        let expected_failures: Vec<usize> = plans
            .iter()
            .enumerate()
            .filter(|(_, (_, fails))| *fails)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(sink.indices(), expected_failures);
    }
}
