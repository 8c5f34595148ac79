// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration and cluster selection
//!
//! The store's base URI comes from, in order of precedence:
//!
//! 1. `--cluster NAME`, looked up in the config file
//! 2. `--base-uri URI`
//! 3. the config file's `default-cluster`
//!
//! The config file is YAML:
//!
//! ```yaml
//! default-cluster: demo
//! clusters:
//! - name: demo
//!   cluster:
//!     base-uri: https://demo.openchami.cluster:8443
//! ```
//!
//! The access token is `--token` or, failing that, the environment variable
//! `<CLUSTER>_ACCESS_TOKEN` of the selected cluster.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "INVENTORY_DISCOVER_CONFIG";

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("unable to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("cluster {0:?} not found in config file")]
    UnknownCluster(String),

    #[error("cluster {0:?} has no base-uri")]
    MissingBaseUri(String),

    #[error("no base URI: pass --base-uri, --cluster, or set default-cluster in the config file")]
    NoBaseUri,
}

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "default-cluster", default, skip_serializing_if = "Option::is_none")]
    pub default_cluster: Option<String>,
    #[serde(default)]
    pub clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEntry {
    pub name: String,
    #[serde(default)]
    pub cluster: ClusterSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSettings {
    #[serde(rename = "base-uri", default)]
    pub base_uri: String,
}

impl ConfigFile {
    pub fn from_yaml(data: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(data).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        debug!("reading config file {}", shown);
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read {
                path: shown.clone(),
                message: e.to_string(),
            })?;
        Self::from_yaml(&data, &shown)
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterEntry> {
        self.clusters.iter().find(|c| c.name == name)
    }

    fn base_uri_of(&self, name: &str) -> Result<String, ConfigError> {
        let entry = self
            .cluster(name)
            .ok_or_else(|| ConfigError::UnknownCluster(name.to_string()))?;
        if entry.cluster.base_uri.is_empty() {
            return Err(ConfigError::MissingBaseUri(name.to_string()));
        }
        Ok(entry.cluster.base_uri.clone())
    }
}

/// Where requests go, and which cluster (if any) that is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub base_url: String,
    pub cluster: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the base URI by precedence: cluster flag, base-uri flag, default cluster
pub fn resolve_target(
    file: Option<&ConfigFile>,
    cluster: Option<&str>,
    base_uri: Option<&str>,
) -> Result<Target, ConfigError> {
    if let Some(name) = non_empty(cluster) {
        let file = file.ok_or_else(|| ConfigError::UnknownCluster(name.to_string()))?;
        debug!("using base URI of cluster {}", name);
        return Ok(Target {
            base_url: file.base_uri_of(name)?,
            cluster: Some(name.to_string()),
        });
    }

    if let Some(uri) = non_empty(base_uri) {
        return Ok(Target {
            base_url: uri.to_string(),
            cluster: None,
        });
    }

    if let Some(file) = file {
        if let Some(name) = non_empty(file.default_cluster.as_deref()) {
            debug!("using base URI of default cluster {}", name);
            return Ok(Target {
                base_url: file.base_uri_of(name)?,
                cluster: Some(name.to_string()),
            });
        }
    }

    Err(ConfigError::NoBaseUri)
}

/// `demo-cluster` → `DEMO_CLUSTER_ACCESS_TOKEN`
pub fn token_env_var(cluster: &str) -> String {
    let name: String = cluster
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect();
    format!("{}_ACCESS_TOKEN", name.to_uppercase())
}

/// Token from the flag, else from the cluster's environment variable.
/// `env` looks up environment variables.
pub fn resolve_token<F>(explicit: Option<&str>, cluster: Option<&str>, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = non_empty(explicit) {
        return Some(token.to_string());
    }
    let var = token_env_var(non_empty(cluster)?);
    debug!("looking up access token in {}", var);
    env(&var).filter(|t| !t.trim().is_empty())
}
