// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Collections
//!
//! Wire representations of the four state-manager collections that static
//! discovery writes. Field names follow the state manager's JSON schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four remote collections, in the order they must be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Components,
    RedfishEndpoints,
    EthernetInterfaces,
    Groups,
}

impl Collection {
    /// Components precede redfish endpoints: creating an endpoint for an
    /// unknown component makes the store auto-assign a NID.
    pub const ORDER: [Collection; 4] = [
        Collection::Components,
        Collection::RedfishEndpoints,
        Collection::EthernetInterfaces,
        Collection::Groups,
    ];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Components => "component",
            Collection::RedfishEndpoints => "redfish endpoint",
            Collection::EthernetInterfaces => "ethernet interface",
            Collection::Groups => "group",
        };
        write!(f, "{}", name)
    }
}

/// State record for a compute node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Role", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "Enabled", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "Arch", skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(rename = "NID")]
    pub nid: i64,
}

/// Out-of-band management controller of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedfishEndpoint {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Hostname", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(rename = "Domain", skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(rename = "FQDN", skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "MACAddr")]
    pub mac_addr: String,
    #[serde(rename = "User", skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A MAC address and its IPs, attached to a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetInterface {
    /// Lowercase MAC with separators stripped
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ComponentID")]
    pub component_id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "MACAddress")]
    pub mac_address: String,
    #[serde(rename = "IPAddresses")]
    pub ip_addresses: Vec<EthernetIp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetIp {
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "Network")]
    pub network: String,
}

/// Named, non-exclusive set of component ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(
        rename = "exclusiveGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exclusive_group: Option<String>,
    pub members: GroupMembers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembers {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Output of the resource compiler; read-only once produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledInventory {
    pub components: Vec<Component>,
    pub redfish_endpoints: Vec<RedfishEndpoint>,
    pub ethernet_interfaces: Vec<EthernetInterface>,
    pub groups: Vec<Group>,
}

impl CompiledInventory {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.redfish_endpoints.is_empty()
            && self.ethernet_interfaces.is_empty()
            && self.groups.is_empty()
    }
}
