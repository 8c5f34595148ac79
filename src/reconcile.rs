// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collection Reconciler
//!
//! Applies one compiled collection to an [`InventoryStore`]. The same routine
//! serves all four collections; what differs between them is captured by a
//! [`Protocol`]:
//!
//! ```text
//! Plain:      Create(all)                         conflicts are failures
//! Overwrite:
//!   PerItemOptimistic { fallback }
//!               for item: Create(item) --409--> fallback(item)   (once)
//!   BulkReplace { followup }
//!               Replace(all) then followup(all)
//! ```
//!
//! A failing item never stops the collection: it is logged with its
//! identifier, recorded in the [`CollectionReport`], and the next item is
//! processed.

use std::slice;
use tracing::{debug, error, info};

use crate::inventory::Collection;
use crate::store::{InventoryResource, InventoryStore, ItemOutcome, StoreError, WriteVerb};

/// How a run treats items that may already exist remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Assume a clean store; a conflict is an item failure
    #[default]
    Plain,
    /// Tolerate existing items and bring them up to date
    Overwrite,
}

impl WriteMode {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Plain
        }
    }
}

/// Overwrite-mode behaviour of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteStrategy {
    /// Create each item; on conflict issue exactly one `fallback` call for it
    PerItemOptimistic { fallback: WriteVerb },
    /// Replace the whole collection, then issue `followup` for all of it
    BulkReplace { followup: Option<WriteVerb> },
}

/// Capability record of one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub create: WriteVerb,
    pub overwrite: OverwriteStrategy,
}

impl Protocol {
    pub fn for_collection(collection: Collection) -> Self {
        let overwrite = match collection {
            // Replace ignores NID changes on the store side, so the NIDs are
            // patched separately.
            Collection::Components => OverwriteStrategy::BulkReplace {
                followup: Some(WriteVerb::PatchNid),
            },
            Collection::RedfishEndpoints => OverwriteStrategy::PerItemOptimistic {
                fallback: WriteVerb::Replace,
            },
            // No PUT for these two.
            Collection::EthernetInterfaces | Collection::Groups => {
                OverwriteStrategy::PerItemOptimistic {
                    fallback: WriteVerb::PartialUpdate,
                }
            }
        };
        Self {
            create: WriteVerb::Create,
            overwrite,
        }
    }
}

/// A failed store request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Identifier(s) of the item(s) the request covered
    pub target: String,
    pub verb: WriteVerb,
    pub error: StoreError,
}

/// Result of reconciling one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub collection: Collection,
    /// Items handed to the reconciler
    pub attempted: usize,
    /// Conflict fallback calls issued
    pub fallbacks: usize,
    pub failures: Vec<ItemFailure>,
}

impl CollectionReport {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            attempted: 0,
            fallbacks: 0,
            failures: Vec::new(),
        }
    }

    /// The per-collection "errors occurred" flag
    pub fn errors_occurred(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record_failure(&mut self, target: impl Into<String>, verb: WriteVerb, error: StoreError) {
        let target = target.into();
        error!(
            collection = %self.collection,
            id = %target,
            verb = %verb,
            "failed to {} {} {}: {}",
            verb,
            self.collection,
            target,
            error
        );
        self.failures.push(ItemFailure { target, verb, error });
    }

    /// Record every failed outcome; conflicts included.
    fn record_outcomes(&mut self, verb: WriteVerb, outcomes: Vec<ItemOutcome>) {
        for outcome in outcomes {
            if let Err(e) = outcome.result {
                self.record_failure(outcome.target, verb, e);
            }
        }
    }
}

fn joined_ids<R: InventoryResource>(items: &[R]) -> String {
    items.iter().map(|i| i.id()).collect::<Vec<_>>().join(",")
}

/// Issue one store call and record its failures. A call that yields no
/// outcome at all counts as a failure.
async fn write_recorded<S, R>(
    store: &S,
    verb: WriteVerb,
    items: &[R],
    report: &mut CollectionReport,
) where
    S: InventoryStore,
    R: InventoryResource,
{
    match store.write(verb, items).await {
        Ok(outcomes) if outcomes.is_empty() => {
            report.record_failure(
                joined_ids(items),
                verb,
                StoreError::Request("store returned no result".to_string()),
            );
        }
        Ok(outcomes) => report.record_outcomes(verb, outcomes),
        Err(e) => report.record_failure(joined_ids(items), verb, e),
    }
}

/// Reconcile `items` of collection `R` against `store`
pub async fn reconcile_collection<S, R>(store: &S, items: &[R], mode: WriteMode) -> CollectionReport
where
    S: InventoryStore,
    R: InventoryResource,
{
    let collection = R::COLLECTION;
    let protocol = Protocol::for_collection(collection);
    let mut report = CollectionReport::new(collection);
    report.attempted = items.len();

    if items.is_empty() {
        debug!(collection = %collection, "nothing to write");
        return report;
    }

    match (mode, protocol.overwrite) {
        (WriteMode::Plain, _) => {
            debug!(collection = %collection, "creating {} items", items.len());
            write_recorded(store, protocol.create, items, &mut report).await;
        }
        (WriteMode::Overwrite, OverwriteStrategy::BulkReplace { followup }) => {
            debug!(collection = %collection, "replacing {} items", items.len());
            write_recorded(store, WriteVerb::Replace, items, &mut report).await;
            if let Some(verb) = followup {
                debug!(collection = %collection, "issuing {} for {} items", verb, items.len());
                write_recorded(store, verb, items, &mut report).await;
            }
        }
        (WriteMode::Overwrite, OverwriteStrategy::PerItemOptimistic { fallback }) => {
            for item in items {
                let single = slice::from_ref(item);
                let outcomes = match store.write(protocol.create, single).await {
                    Ok(outcomes) => outcomes,
                    Err(e) => {
                        report.record_failure(item.id(), protocol.create, e);
                        continue;
                    }
                };
                if outcomes.is_empty() {
                    report.record_failure(
                        item.id(),
                        protocol.create,
                        StoreError::Request("store returned no result".to_string()),
                    );
                    continue;
                }

                let conflicted = outcomes
                    .iter()
                    .any(|o| matches!(&o.result, Err(e) if e.is_conflict()));
                let others: Vec<ItemOutcome> = outcomes
                    .into_iter()
                    .filter(|o| !matches!(&o.result, Err(e) if e.is_conflict()))
                    .collect();
                report.record_outcomes(protocol.create, others);

                if conflicted {
                    info!(
                        collection = %collection,
                        id = %item.id(),
                        "{} {} exists, attempting to update it",
                        collection,
                        item.id()
                    );
                    report.fallbacks += 1;
                    write_recorded(store, fallback, single, &mut report).await;
                }
            }
        }
    }

    if report.errors_occurred() {
        debug!(collection = %collection, failures = report.failures.len(), "collection had errors");
    }
    report
}
