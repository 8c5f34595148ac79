// Copyright (c) 2025 - Cowboy AI, Inc.
//! Static Discovery
//!
//! Loads and compiles a payload, then reconciles the four collections in a
//! fixed order:
//!
//! ```text
//! Components → RedfishEndpoints → EthernetInterfaces → Groups
//! ```
//!
//! Components go first so the store never auto-assigns a NID to a node whose
//! endpoint arrives before it. Every collection is attempted, whatever
//! happened to the ones before it.

use tracing::info;

use crate::compile::compile;
use crate::errors::DiscoverResult;
use crate::inventory::{Collection, CompiledInventory};
use crate::outcome::DiscoveryReport;
use crate::payload::{read_payload, DataFormat};
use crate::reconcile::{reconcile_collection, WriteMode};
use crate::store::{HttpInventoryStore, InventoryStore, StoreConfig};

/// Read and compile a payload. Any failure here is a setup error.
pub async fn load_inventory(path: &str, format: Option<DataFormat>) -> DiscoverResult<CompiledInventory> {
    let nodes = read_payload(path, format).await?;
    let inventory = compile(&nodes)?;
    info!(
        components = inventory.components.len(),
        redfish_endpoints = inventory.redfish_endpoints.len(),
        ethernet_interfaces = inventory.ethernet_interfaces.len(),
        groups = inventory.groups.len(),
        "compiled payload"
    );
    Ok(inventory)
}

/// Build the store client and check readiness once. An unready store is a
/// setup error.
pub async fn connect_store(config: StoreConfig) -> DiscoverResult<HttpInventoryStore> {
    let store = HttpInventoryStore::new(config).await?;
    store.health_check().await?;
    info!("state manager is ready");
    Ok(store)
}

/// Reconcile a compiled inventory against `store`
pub async fn run_discovery<S: InventoryStore>(
    store: &S,
    inventory: &CompiledInventory,
    mode: WriteMode,
) -> DiscoveryReport {
    let mut outcome = DiscoveryReport::new();

    for collection in Collection::ORDER {
        let report = match collection {
            Collection::Components => reconcile_collection(store, &inventory.components, mode).await,
            Collection::RedfishEndpoints => {
                reconcile_collection(store, &inventory.redfish_endpoints, mode).await
            }
            Collection::EthernetInterfaces => {
                reconcile_collection(store, &inventory.ethernet_interfaces, mode).await
            }
            Collection::Groups => reconcile_collection(store, &inventory.groups, mode).await,
        };
        outcome.record(report);
    }

    outcome.log_summary();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DiscoverError;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_inventory_compiles_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"{"nodes":[{"name":"n","nid":3,"xname":"x1000c0s0b0n0","bmc_mac":"","bmc_ip":"10.0.0.3","group":"compute","interfaces":[]}]}"#,
        )
        .unwrap();

        let inventory = load_inventory(file.path().to_str().unwrap(), None).await.unwrap();
        assert_eq!(inventory.components.len(), 1);
        assert_eq!(inventory.groups[0].label, "compute");
    }

    #[tokio::test]
    async fn test_connect_store_fails_when_unreachable() {
        let config = StoreConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let err = connect_store(config).await.err().unwrap();
        assert!(matches!(err, DiscoverError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_load_inventory_rejects_bad_ip() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"nodes:\n- nid: 1\n  xname: x1000c0s0b0n0\n  bmc_ip: not-an-ip\n")
            .unwrap();

        let err = load_inventory(file.path().to_str().unwrap(), None).await.unwrap_err();
        assert!(matches!(err, DiscoverError::Compile(_)));
    }
}
