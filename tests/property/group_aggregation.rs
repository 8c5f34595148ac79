// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Group Aggregation
//!
//! However nodes are spread over labels, compiling yields one group per label
//! whose members are exactly the xnames of the nodes carrying it.

use inventory_discover::{compile, NodeList, NodeSpec};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const LABELS: [&str; 4] = ["compute", "login", "gpu", "storage"];

fn node(i: usize, label: Option<usize>) -> NodeSpec {
    NodeSpec {
        name: format!("node{:02}", i),
        nid: i as i64 + 1,
        xname: format!("x1000c0s{}b0n0", i),
        bmc_ip: format!("10.0.0.{}", i + 1),
        group: label.map(|l| LABELS[l].to_string()),
        ..Default::default()
    }
}

/// Up to 24 nodes, each with no group or one of four labels
fn node_list() -> impl Strategy<Value = NodeList> {
    prop::collection::vec(prop::option::of(0..LABELS.len()), 0..24).prop_map(|labels| NodeList {
        nodes: labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| node(i, label))
            .collect(),
    })
}

fn expected_groups(nodes: &NodeList) -> BTreeMap<String, BTreeSet<String>> {
    let mut expected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in &nodes.nodes {
        if let Some(label) = &node.group {
            expected
                .entry(label.clone())
                .or_default()
                .insert(node.xname.clone());
        }
    }
    expected
}

proptest! {
    /// Property: one group per label, members equal to the labelled xnames
    #[test]
    fn prop_one_group_per_label(nodes in node_list()) {
        let inventory = compile(&nodes).unwrap();

        let labels: Vec<&str> = inventory.groups.iter().map(|g| g.label.as_str()).collect();
        let unique: BTreeSet<&str> = labels.iter().copied().collect();
        prop_assert_eq!(labels.len(), unique.len(), "Each label must appear exactly once");

        let actual: BTreeMap<String, BTreeSet<String>> = inventory
            .groups
            .iter()
            .map(|g| (g.label.clone(), g.members.ids.iter().cloned().collect()))
            .collect();
        prop_assert_eq!(actual, expected_groups(&nodes));
    }

    /// Property: no member is listed twice and every member is a component
    #[test]
    fn prop_members_reference_components(nodes in node_list()) {
        let inventory = compile(&nodes).unwrap();
        let components: BTreeSet<&str> = inventory.components.iter().map(|c| c.id.as_str()).collect();

        for group in &inventory.groups {
            let members: BTreeSet<&str> = group.members.ids.iter().map(String::as_str).collect();
            prop_assert_eq!(members.len(), group.members.ids.len(), "Duplicate member in {}", group.label);
            prop_assert!(members.is_subset(&components));
            prop_assert_eq!(&group.description, &format!("The {} group", group.label));
        }
    }

    /// Property: component and redfish endpoint ids pair up
    #[test]
    fn prop_component_and_endpoint_ids_match(nodes in node_list()) {
        let inventory = compile(&nodes).unwrap();

        let components: Vec<&str> = inventory.components.iter().map(|c| c.id.as_str()).collect();
        let endpoints: Vec<&str> = inventory.redfish_endpoints.iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(components, endpoints);
    }

    /// Property: grouping does not depend on node order
    #[test]
    fn prop_aggregation_is_order_independent(nodes in node_list()) {
        let mut reversed = nodes.clone();
        reversed.nodes.reverse();

        prop_assert_eq!(
            expected_groups(&nodes),
            compile(&reversed)
                .unwrap()
                .groups
                .into_iter()
                .map(|g| (g.label, g.members.ids.into_iter().collect()))
                .collect::<BTreeMap<String, BTreeSet<String>>>()
        );
    }
}
