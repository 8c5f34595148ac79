// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for inventory-discover
//!
//! Deterministic node lists and an in-memory store that records every call.
//!
//! # Design Principles
//! - Fixtures are the only place that builds payloads
//! - The recording store answers like the state manager: create conflicts on
//!   existing ids, replace upserts, partial update needs an existing item
//! - Failures are scripted per (collection, verb, id), never random

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use inventory_discover::payload::{InterfaceIpSpec, InterfaceSpec};
use inventory_discover::store::{InventoryResource, InventoryStore, ItemOutcome, StoreError, StoreResult};
use inventory_discover::{Collection, NodeList, NodeSpec, WriteVerb};

pub const GROUP_COMPUTE: &str = "compute";

/// A node with one interface on the `internal` network
pub fn node(name: &str, nid: i64, xname: &str, group: Option<&str>) -> NodeSpec {
    NodeSpec {
        name: name.to_string(),
        nid,
        xname: xname.to_string(),
        bmc_mac: format!("de:ca:fc:0f:ee:{:02x}", nid),
        bmc_ip: format!("172.16.0.{}", 100 + nid),
        bmc_fqdn: None,
        group: group.map(str::to_string),
        groups: Vec::new(),
        interfaces: vec![InterfaceSpec {
            mac_addr: format!("02:00:00:00:00:{:02x}", nid),
            ip_addrs: vec![InterfaceIpSpec {
                name: "internal".to_string(),
                ip_addr: format!("172.16.1.{}", nid),
            }],
        }],
    }
}

/// Interface id the compiler derives for `node(_, nid, ..)`
pub fn interface_id(nid: i64) -> String {
    format!("0200000000{:02x}", nid)
}

/// `n1` (nid 1) and `n2` (nid 2), both in the compute group
pub fn two_compute_nodes() -> NodeList {
    NodeList {
        nodes: vec![
            node("node01", 1, "n1", Some(GROUP_COMPUTE)),
            node("node02", 2, "n2", Some(GROUP_COMPUTE)),
        ],
    }
}

/// Realistic xnames across two groups
pub fn rack_nodes() -> NodeList {
    NodeList {
        nodes: vec![
            node("node01", 1, "x1000c1s7b0n0", Some(GROUP_COMPUTE)),
            node("node02", 2, "x1000c1s7b1n0", Some(GROUP_COMPUTE)),
            node("login01", 3, "x1000c1s8b0n0", Some("login")),
        ],
    }
}

/// One store call as seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub collection: Collection,
    pub verb: WriteVerb,
    pub ids: Vec<String>,
}

impl Call {
    pub fn new(collection: Collection, verb: WriteVerb, ids: &[&str]) -> Self {
        Self {
            collection,
            verb,
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Default)]
struct State {
    items: BTreeMap<(String, String), Value>,
    calls: Vec<Call>,
    scripted: HashMap<(Collection, WriteVerb, String), StoreError>,
}

fn key(collection: Collection, id: &str) -> (String, String) {
    (collection.to_string(), id.to_string())
}

/// In-memory store recording every call
#[derive(Default)]
pub struct RecordingStore {
    state: Mutex<State>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `id` already exists remotely
    pub fn seed(&self, collection: Collection, id: &str) {
        let mut state = self.state.lock().unwrap();
        state.items.insert(key(collection, id), Value::Null);
    }

    /// Make `verb` on `id` fail with `error`
    pub fn fail(&self, collection: Collection, verb: WriteVerb, id: &str, error: StoreError) {
        let mut state = self.state.lock().unwrap();
        state.scripted.insert((collection, verb, id.to_string()), error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, collection: Collection) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.collection == collection)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn contains(&self, collection: Collection, id: &str) -> bool {
        self.state.lock().unwrap().items.contains_key(&key(collection, id))
    }

    pub fn snapshot(&self) -> BTreeMap<(String, String), Value> {
        self.state.lock().unwrap().items.clone()
    }
}

pub fn conflict() -> StoreError {
    StoreError::Conflict {
        status: 409,
        body: "already exists".to_string(),
    }
}

pub fn bad_request() -> StoreError {
    StoreError::Unsuccessful {
        status: 400,
        body: "bad request".to_string(),
    }
}

fn not_found() -> StoreError {
    StoreError::Unsuccessful {
        status: 404,
        body: "not found".to_string(),
    }
}

#[async_trait]
impl InventoryStore for RecordingStore {
    async fn write<R>(&self, verb: WriteVerb, items: &[R]) -> StoreResult<Vec<ItemOutcome>>
    where
        R: InventoryResource,
    {
        // Same verb support as the HTTP store.
        R::plan(verb, items)?;

        let collection = R::COLLECTION;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            collection,
            verb,
            ids: items.iter().map(|i| i.id().to_string()).collect(),
        });

        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id();
            if let Some(err) = state.scripted.get(&(collection, verb, id.to_string())) {
                outcomes.push(ItemOutcome::failed(id, err.clone()));
                continue;
            }

            let k = key(collection, id);
            let exists = state.items.contains_key(&k);
            let body = serde_json::to_value(item).unwrap();
            let result = match verb {
                WriteVerb::Create if exists => Err(conflict()),
                WriteVerb::Create | WriteVerb::Replace => {
                    state.items.insert(k, body);
                    Ok(())
                }
                WriteVerb::PartialUpdate if exists => {
                    state.items.insert(k, body);
                    Ok(())
                }
                WriteVerb::PatchNid if exists => {
                    if let Some(obj) = state.items.get_mut(&k).and_then(Value::as_object_mut) {
                        obj.insert("NID".to_string(), body["NID"].clone());
                    }
                    Ok(())
                }
                WriteVerb::PartialUpdate | WriteVerb::PatchNid => Err(not_found()),
            };
            outcomes.push(ItemOutcome { target: id.to_string(), result });
        }
        Ok(outcomes)
    }
}
