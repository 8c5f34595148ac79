// Copyright (c) 2025 - Cowboy AI, Inc.
//! Outcome Aggregator
//!
//! Collects one [`CollectionReport`] per collection and turns them into the
//! overall result of a run. Success only when no collection had errors.

use tracing::{error, info};

use crate::inventory::Collection;
use crate::reconcile::CollectionReport;

/// Process exit status for a run without errors
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit status when any collection had errors, or setup failed
pub const EXIT_FAILURE: i32 = 1;

/// Per-collection results of one discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    reports: Vec<CollectionReport>,
}

impl DiscoveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: CollectionReport) {
        self.reports.push(report);
    }

    /// Reports in the order the collections were reconciled
    pub fn reports(&self) -> &[CollectionReport] {
        &self.reports
    }

    pub fn get(&self, collection: Collection) -> Option<&CollectionReport> {
        self.reports.iter().find(|r| r.collection == collection)
    }

    /// The "errors occurred" flag of one collection; false if it never ran
    pub fn errors_occurred(&self, collection: Collection) -> bool {
        self.get(collection).map_or(false, CollectionReport::errors_occurred)
    }

    pub fn is_success(&self) -> bool {
        !self.reports.iter().any(CollectionReport::errors_occurred)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    pub fn failure_count(&self) -> usize {
        self.reports.iter().map(|r| r.failures.len()).sum()
    }

    pub fn log_summary(&self) {
        for report in &self.reports {
            info!(
                collection = %report.collection,
                attempted = report.attempted,
                fallbacks = report.fallbacks,
                failures = report.failures.len(),
                "{} reconciliation finished",
                report.collection
            );
        }
        if !self.is_success() {
            let failed: Vec<String> = self
                .reports
                .iter()
                .filter(|r| r.errors_occurred())
                .map(|r| r.collection.to_string())
                .collect();
            error!(
                "{} request(s) failed in: {}",
                self.failure_count(),
                failed.join(", ")
            );
        }
    }
}
