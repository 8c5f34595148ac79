// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request planning per collection
//!
//! Maps `(collection, verb, items)` onto the state manager's REST endpoints.
//! Paths are relative to the service base path (`/hsm/v2`).

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use super::{InventoryResource, StoreError, StoreResult, WriteVerb};
use crate::inventory::{Collection, Component, EthernetInterface, Group, RedfishEndpoint};

pub const PATH_COMPONENTS: &str = "/State/Components";
pub const PATH_COMPONENTS_BULK_NID: &str = "/State/Components/BulkNID";
pub const PATH_REDFISH_ENDPOINTS: &str = "/Inventory/RedfishEndpoints";
pub const PATH_ETHERNET_INTERFACES: &str = "/Inventory/EthernetInterfaces";
pub const PATH_GROUPS: &str = "/groups";

/// A fully built request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

/// A request for one or more items, or the reason it could not be built
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRequest {
    pub target: String,
    pub request: StoreResult<HttpRequest>,
}

impl PlannedRequest {
    fn new(target: impl Into<String>, method: Method, path: String, body: StoreResult<Value>) -> Self {
        Self {
            target: target.into(),
            request: body.map(|body| HttpRequest { method, path, body }),
        }
    }
}

fn to_body<T: Serialize>(value: &T) -> StoreResult<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Request(format!("failed to marshal body: {}", e)))
}

fn item_path(base: &str, id: &str) -> StoreResult<String> {
    if id.is_empty() {
        return Err(StoreError::Request("item has a blank identifier".to_string()));
    }
    Ok(format!("{}/{}", base, urlencoding::encode(id)))
}

fn unsupported(collection: Collection, verb: WriteVerb) -> StoreError {
    StoreError::Unsupported { collection, verb }
}

/// One request per item: `method` on `base` (or `base/{id}` when `by_id`).
fn per_item<R: InventoryResource>(items: &[R], method: Method, base: &str, by_id: bool) -> Vec<PlannedRequest> {
    items
        .iter()
        .map(|item| {
            let path = if by_id {
                item_path(base, item.id())
            } else {
                Ok(base.to_string())
            };
            let request = path.and_then(|path| {
                to_body(item).map(|body| HttpRequest {
                    method: method.clone(),
                    path,
                    body,
                })
            });
            PlannedRequest {
                target: item.id().to_string(),
                request,
            }
        })
        .collect()
}

fn joined_ids<R: InventoryResource>(items: &[R]) -> String {
    items.iter().map(|i| i.id()).collect::<Vec<_>>().join(",")
}

impl InventoryResource for Component {
    const COLLECTION: Collection = Collection::Components;

    fn id(&self) -> &str {
        &self.id
    }

    fn plan(verb: WriteVerb, items: &[Self]) -> StoreResult<Vec<PlannedRequest>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        match verb {
            WriteVerb::Create => Ok(vec![PlannedRequest::new(
                joined_ids(items),
                Method::POST,
                PATH_COMPONENTS.to_string(),
                to_body(&json!({ "Components": items })),
            )]),
            // The store only replaces one component per request, wrapped.
            WriteVerb::Replace => Ok(items
                .iter()
                .map(|comp| PlannedRequest {
                    target: comp.id.clone(),
                    request: item_path(PATH_COMPONENTS, &comp.id).and_then(|path| {
                        to_body(&json!({ "Component": comp, "Force": true })).map(|body| HttpRequest {
                            method: Method::PUT,
                            path,
                            body,
                        })
                    }),
                })
                .collect()),
            WriteVerb::PatchNid => {
                let stripped: Vec<Value> = items
                    .iter()
                    .map(|c| json!({ "ID": c.id, "NID": c.nid }))
                    .collect();
                Ok(vec![PlannedRequest::new(
                    joined_ids(items),
                    Method::PATCH,
                    PATH_COMPONENTS_BULK_NID.to_string(),
                    to_body(&json!({ "Components": stripped })),
                )])
            }
            WriteVerb::PartialUpdate => Err(unsupported(Self::COLLECTION, verb)),
        }
    }
}

impl InventoryResource for RedfishEndpoint {
    const COLLECTION: Collection = Collection::RedfishEndpoints;

    fn id(&self) -> &str {
        &self.id
    }

    fn plan(verb: WriteVerb, items: &[Self]) -> StoreResult<Vec<PlannedRequest>> {
        match verb {
            WriteVerb::Create => Ok(per_item(items, Method::POST, PATH_REDFISH_ENDPOINTS, false)),
            WriteVerb::Replace => Ok(per_item(items, Method::PUT, PATH_REDFISH_ENDPOINTS, true)),
            WriteVerb::PartialUpdate | WriteVerb::PatchNid => Err(unsupported(Self::COLLECTION, verb)),
        }
    }
}

impl InventoryResource for EthernetInterface {
    const COLLECTION: Collection = Collection::EthernetInterfaces;

    fn id(&self) -> &str {
        &self.id
    }

    fn plan(verb: WriteVerb, items: &[Self]) -> StoreResult<Vec<PlannedRequest>> {
        match verb {
            WriteVerb::Create => Ok(per_item(items, Method::POST, PATH_ETHERNET_INTERFACES, false)),
            WriteVerb::PartialUpdate => Ok(per_item(items, Method::PATCH, PATH_ETHERNET_INTERFACES, true)),
            WriteVerb::Replace | WriteVerb::PatchNid => Err(unsupported(Self::COLLECTION, verb)),
        }
    }
}

impl InventoryResource for Group {
    const COLLECTION: Collection = Collection::Groups;

    fn id(&self) -> &str {
        &self.label
    }

    fn plan(verb: WriteVerb, items: &[Self]) -> StoreResult<Vec<PlannedRequest>> {
        match verb {
            WriteVerb::Create => Ok(per_item(items, Method::POST, PATH_GROUPS, false)),
            WriteVerb::PartialUpdate => Ok(per_item(items, Method::PATCH, PATH_GROUPS, true)),
            WriteVerb::Replace | WriteVerb::PatchNid => Err(unsupported(Self::COLLECTION, verb)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::GroupMembers;
    use pretty_assertions::assert_eq;

    fn comp(id: &str, nid: i64) -> Component {
        Component {
            id: id.to_string(),
            kind: "Node".to_string(),
            state: Some("On".to_string()),
            role: None,
            enabled: Some(true),
            arch: None,
            nid,
        }
    }

    #[test]
    fn test_component_create_is_one_bulk_request() {
        let plan = Component::plan(WriteVerb::Create, &[comp("n1", 1), comp("n2", 2)]).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].target, "n1,n2");
        let req = plan[0].request.as_ref().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, PATH_COMPONENTS);
        assert_eq!(req.body["Components"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_component_replace_wraps_each_item() {
        let plan = Component::plan(WriteVerb::Replace, &[comp("n1", 1), comp("n2", 2)]).unwrap();
        assert_eq!(plan.len(), 2);
        let req = plan[1].request.as_ref().unwrap();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "/State/Components/n2");
        assert_eq!(req.body["Force"], json!(true));
        assert_eq!(req.body["Component"]["ID"], json!("n2"));
    }

    #[test]
    fn test_component_nid_patch_strips_fields() {
        let plan = Component::plan(WriteVerb::PatchNid, &[comp("n1", 7)]).unwrap();
        let req = plan[0].request.as_ref().unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.path, PATH_COMPONENTS_BULK_NID);
        assert_eq!(req.body, json!({"Components": [{"ID": "n1", "NID": 7}]}));
    }

    #[test]
    fn test_empty_component_batch_issues_nothing() {
        assert!(Component::plan(WriteVerb::Create, &[]).unwrap().is_empty());
        assert!(Component::plan(WriteVerb::PatchNid, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_verbs() {
        assert!(matches!(
            Component::plan(WriteVerb::PartialUpdate, &[comp("n1", 1)]),
            Err(StoreError::Unsupported { .. })
        ));
        assert!(matches!(
            Group::plan(WriteVerb::Replace, &[]),
            Err(StoreError::Unsupported { collection: Collection::Groups, .. })
        ));
        assert!(matches!(
            EthernetInterface::plan(WriteVerb::Replace, &[]),
            Err(StoreError::Unsupported { .. })
        ));
        assert!(matches!(
            RedfishEndpoint::plan(WriteVerb::PartialUpdate, &[]),
            Err(StoreError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_group_patch_path_is_encoded() {
        let group = Group {
            label: "rack 1".to_string(),
            description: "The rack 1 group".to_string(),
            tags: vec![],
            exclusive_group: None,
            members: GroupMembers::default(),
        };
        let plan = Group::plan(WriteVerb::PartialUpdate, &[group]).unwrap();
        assert_eq!(plan[0].request.as_ref().unwrap().path, "/groups/rack%201");
    }

    #[test]
    fn test_blank_id_fails_only_that_item() {
        let mut blank = comp("", 1);
        blank.id.clear();
        let plan = Component::plan(WriteVerb::Replace, &[blank, comp("n2", 2)]).unwrap();
        assert!(matches!(plan[0].request, Err(StoreError::Request(_))));
        assert!(plan[1].request.is_ok());
    }
}
