// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Compiler
//!
//! Pure transformation from a [`NodeList`] into the four target collections.
//! No I/O happens here; every failure is a malformed payload and aborts the
//! run before anything is written.
//!
//! Groups are built by aggregation: every node naming a label contributes its
//! xname to the single [`Group`] carrying that label.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{parse_ip, MacAddress, NetworkError, Xname, XnameError, XnameKind};
use crate::inventory::{
    CompiledInventory, Component, EthernetInterface, EthernetIp, Group, GroupMembers,
    RedfishEndpoint,
};
use crate::payload::{NodeList, NodeSpec};

pub const COMPONENT_TYPE_NODE: &str = "Node";
pub const COMPONENT_STATE_ON: &str = "On";
pub const REDFISH_TYPE_NODE_BMC: &str = "NodeBMC";

/// Payload content that cannot be turned into inventory records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("node #{index}: invalid xname {xname:?}: {source}")]
    InvalidXname {
        index: usize,
        xname: String,
        source: XnameError,
    },

    #[error("node {xname}: invalid BMC IP address: {source}")]
    InvalidBmcIp { xname: String, source: NetworkError },

    #[error("node {xname}: invalid BMC MAC address: {source}")]
    InvalidBmcMac { xname: String, source: NetworkError },

    #[error("node {xname}: interface #{iface}: invalid MAC address: {source}")]
    InvalidInterfaceMac {
        xname: String,
        iface: usize,
        source: NetworkError,
    },

    #[error("node {xname}: interface #{iface}: invalid IP address: {source}")]
    InvalidInterfaceIp {
        xname: String,
        iface: usize,
        source: NetworkError,
    },

    #[error("node {xname}: interface #{iface} has no IP addresses")]
    InterfaceWithoutIp { xname: String, iface: usize },
}

/// Compile a node list into components, redfish endpoints, ethernet
/// interfaces and groups.
///
/// Guarantees on success:
/// - one component and one redfish endpoint per distinct xname, with equal ids
/// - every interface and group member references a compiled component
/// - each group label appears exactly once
pub fn compile(nodes: &NodeList) -> Result<CompiledInventory, CompileError> {
    let mut out = CompiledInventory::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut groups = GroupAccumulator::default();

    for (index, node) in nodes.nodes.iter().enumerate() {
        let xname = Xname::new(node.xname.clone()).map_err(|source| CompileError::InvalidXname {
            index,
            xname: node.xname.clone(),
            source,
        })?;
        if xname.kind() != XnameKind::Node {
            warn!(xname = %xname, "xname does not have the x#c#s#b#n# node form");
        }

        let ifaces = compile_interfaces(&xname, node)?;
        // Duplicates are validated too, even though only the first is kept.
        let endpoint = compile_redfish_endpoint(&xname, node)?;

        if seen.insert(xname.as_str().to_string()) {
            debug!(xname = %xname, nid = node.nid, "generating component and redfish endpoint");
            out.components.push(compile_component(&xname, node));
            out.redfish_endpoints.push(endpoint);
        } else {
            warn!(xname = %xname, "component with this xname already declared (duplicate?), not adding");
        }

        out.ethernet_interfaces.extend(ifaces);

        for label in node.group_labels() {
            groups.add(label, xname.as_str());
        }
    }

    out.groups = groups.finish();
    debug!(
        components = out.components.len(),
        redfish_endpoints = out.redfish_endpoints.len(),
        ethernet_interfaces = out.ethernet_interfaces.len(),
        groups = out.groups.len(),
        "compiled inventory"
    );
    Ok(out)
}

fn compile_component(xname: &Xname, node: &NodeSpec) -> Component {
    Component {
        id: xname.to_string(),
        kind: COMPONENT_TYPE_NODE.to_string(),
        state: Some(COMPONENT_STATE_ON.to_string()),
        role: None,
        enabled: Some(true),
        arch: None,
        nid: node.nid,
    }
}

fn compile_redfish_endpoint(xname: &Xname, node: &NodeSpec) -> Result<RedfishEndpoint, CompileError> {
    let ip = parse_ip(&node.bmc_ip).map_err(|source| CompileError::InvalidBmcIp {
        xname: xname.to_string(),
        source,
    })?;

    let mac = if node.bmc_mac.is_empty() {
        String::new()
    } else {
        MacAddress::new(&node.bmc_mac)
            .map_err(|source| CompileError::InvalidBmcMac {
                xname: xname.to_string(),
                source,
            })?
            .as_str()
    };

    let fqdn = node
        .bmc_fqdn
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let (hostname, domain) = match fqdn.map(|f| f.split_once('.')) {
        Some(Some((host, domain))) => (Some(host.to_string()), Some(domain.to_string())),
        Some(None) => (fqdn.map(str::to_string), None),
        None => (None, None),
    };

    Ok(RedfishEndpoint {
        id: xname.to_string(),
        kind: REDFISH_TYPE_NODE_BMC.to_string(),
        name: node.name.clone(),
        hostname,
        domain,
        fqdn: fqdn.map(str::to_string),
        ip_address: ip.to_string(),
        mac_addr: mac,
        user: None,
        password: None,
    })
}

fn compile_interfaces(xname: &Xname, node: &NodeSpec) -> Result<Vec<EthernetInterface>, CompileError> {
    let mut ifaces = Vec::with_capacity(node.interfaces.len());
    for (iface, spec) in node.interfaces.iter().enumerate() {
        let mac = MacAddress::new(&spec.mac_addr).map_err(|source| {
            CompileError::InvalidInterfaceMac {
                xname: xname.to_string(),
                iface,
                source,
            }
        })?;
        if spec.ip_addrs.is_empty() {
            return Err(CompileError::InterfaceWithoutIp {
                xname: xname.to_string(),
                iface,
            });
        }

        let mut ip_addresses = Vec::with_capacity(spec.ip_addrs.len());
        for ip in &spec.ip_addrs {
            let addr = parse_ip(&ip.ip_addr).map_err(|source| CompileError::InvalidInterfaceIp {
                xname: xname.to_string(),
                iface,
                source,
            })?;
            ip_addresses.push(EthernetIp {
                ip_address: addr.to_string(),
                network: ip.name.clone(),
            });
        }

        ifaces.push(EthernetInterface {
            id: mac.compact(),
            component_id: xname.to_string(),
            kind: COMPONENT_TYPE_NODE.to_string(),
            description: format!("Interface {} for {}", iface, node.name),
            mac_address: mac.as_str(),
            ip_addresses,
        });
    }
    Ok(ifaces)
}

/// Label → group, in first-seen order
#[derive(Default)]
struct GroupAccumulator {
    index: HashMap<String, usize>,
    groups: Vec<Group>,
}

impl GroupAccumulator {
    fn add(&mut self, label: &str, xname: &str) {
        match self.index.get(label) {
            Some(&i) => {
                let ids = &mut self.groups[i].members.ids;
                if !ids.iter().any(|id| id == xname) {
                    ids.push(xname.to_string());
                }
            }
            None => {
                self.index.insert(label.to_string(), self.groups.len());
                self.groups.push(Group {
                    label: label.to_string(),
                    description: format!("The {} group", label),
                    tags: Vec::new(),
                    exclusive_group: None,
                    members: GroupMembers {
                        ids: vec![xname.to_string()],
                    },
                });
            }
        }
    }

    fn finish(self) -> Vec<Group> {
        self.groups
    }
}
