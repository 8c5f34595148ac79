// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Exit Status
//!
//! The exit code is 1 exactly when some collection recorded a failure.

use inventory_discover::outcome::{DiscoveryReport, EXIT_FAILURE, EXIT_SUCCESS};
use inventory_discover::reconcile::ItemFailure;
use inventory_discover::{Collection, CollectionReport, StoreError, WriteVerb};
use proptest::prelude::*;

fn report(collection: Collection, failures: usize) -> CollectionReport {
    let mut report = CollectionReport::new(collection);
    report.attempted = failures;
    for i in 0..failures {
        report.failures.push(ItemFailure {
            target: format!("item{}", i),
            verb: WriteVerb::Create,
            error: StoreError::Transport("connection refused".to_string()),
        });
    }
    report
}

proptest! {
    #[test]
    fn prop_exit_code_is_monotone(failures in prop::array::uniform4(0usize..3)) {
        let mut outcome = DiscoveryReport::new();
        for (collection, count) in Collection::ORDER.into_iter().zip(failures) {
            outcome.record(report(collection, count));
        }

        let any_failed = failures.iter().any(|&n| n > 0);
        let expected = if any_failed { EXIT_FAILURE } else { EXIT_SUCCESS };
        prop_assert_eq!(outcome.exit_code(), expected);
        prop_assert_eq!(outcome.failure_count(), failures.iter().sum::<usize>());

        for (collection, count) in Collection::ORDER.into_iter().zip(failures) {
            prop_assert_eq!(outcome.errors_occurred(collection), count > 0);
        }
    }
}
