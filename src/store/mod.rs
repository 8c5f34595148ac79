// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Store Client
//!
//! The reconciler only ever talks to the remote inventory through
//! [`InventoryStore`]. One call writes a batch of items of a single
//! collection with one [`WriteVerb`] and reports, per HTTP request issued, an
//! [`ItemOutcome`]. An `Err` from the call itself means nothing could be
//! attempted (e.g. the verb is not offered for that collection).
//!
//! ```text
//!                 Create        Replace        PartialUpdate   PatchNid
//! Components      bulk POST     PUT per item   -               bulk PATCH
//! RedfishEndpts   POST/item     PUT per item   -               -
//! EthernetIfaces  POST/item     -              PATCH per item  -
//! Groups          POST/item     -              PATCH per item  -
//! ```

pub mod http;
pub mod routes;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::inventory::Collection;

pub use http::{HttpInventoryStore, StoreConfig};
pub use routes::{HttpRequest, PlannedRequest};

/// Write operations the store offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteVerb {
    /// POST; fails with a conflict if the item exists
    Create,
    /// PUT; idempotent replace
    Replace,
    /// PATCH of an existing item
    PartialUpdate,
    /// PATCH of the NID field only (components)
    PatchNid,
}

impl fmt::Display for WriteVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteVerb::Create => "create",
            WriteVerb::Replace => "replace",
            WriteVerb::PartialUpdate => "partial update",
            WriteVerb::PatchNid => "NID update",
        };
        write!(f, "{}", name)
    }
}

/// Errors reported by the store, per item or per call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The remote already holds an item with this identity (HTTP 409)
    #[error("conflict: {status}: {body}")]
    Conflict { status: u16, body: String },

    /// Any other non-2xx response
    #[error("unsuccessful HTTP status: {status}: {body}")]
    Unsuccessful { status: u16, body: String },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The request could not be built
    #[error("invalid request: {0}")]
    Request(String),

    /// The store offers no such verb for this collection
    #[error("{verb} is not supported for {collection} collection")]
    Unsupported { collection: Collection, verb: WriteVerb },
}

impl StoreError {
    /// The single signal that drives conflict fallback
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Result type for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of one request issued by a store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Identifier(s) of the item(s) the request covered
    pub target: String,
    pub result: StoreResult<()>,
}

impl ItemOutcome {
    pub fn ok(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            result: Ok(()),
        }
    }

    pub fn failed(target: impl Into<String>, error: StoreError) -> Self {
        Self {
            target: target.into(),
            result: Err(error),
        }
    }
}

/// An item of one of the four collections
pub trait InventoryResource: Serialize + Send + Sync {
    const COLLECTION: Collection;

    /// Identity used in request paths and log lines
    fn id(&self) -> &str;

    /// Map a batch write onto HTTP requests
    fn plan(verb: WriteVerb, items: &[Self]) -> StoreResult<Vec<PlannedRequest>>
    where
        Self: Sized;
}

/// Typed write access to the remote inventory
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Write `items` with `verb`. Every request issued yields one outcome,
    /// in item order; a failing item never stops the rest of the batch.
    async fn write<R>(&self, verb: WriteVerb, items: &[R]) -> StoreResult<Vec<ItemOutcome>>
    where
        R: InventoryResource;
}
