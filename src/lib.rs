//! Static discovery for cluster inventory
//!
//! Compiles a declarative node list into state-manager collections and
//! reconciles them against the remote inventory store.

pub mod compile;
pub mod config;
pub mod discover;
pub mod domain;
pub mod errors;
pub mod inventory;
pub mod outcome;
pub mod payload;
pub mod reconcile;
pub mod store;

// Re-export commonly used types
pub use compile::{compile, CompileError};
pub use discover::{connect_store, load_inventory, run_discovery};
pub use errors::{DiscoverError, DiscoverResult};
pub use inventory::{CompiledInventory, Collection};
pub use outcome::DiscoveryReport;
pub use payload::{DataFormat, NodeList, NodeSpec};
pub use reconcile::{reconcile_collection, CollectionReport, WriteMode};
pub use store::{HttpInventoryStore, InventoryStore, StoreConfig, StoreError, WriteVerb};
