// Copyright (c) 2025 - Cowboy AI, Inc.
//! Payload Loader
//!
//! Reads the declarative node list that static discovery consumes. In YAML a
//! payload looks like:
//!
//! ```yaml
//! nodes:
//! - name: node01
//!   nid: 1
//!   xname: x1000c1s7b0n0
//!   bmc_mac: de:ca:fc:0f:ee:ee
//!   bmc_ip: 172.16.0.101
//!   group: compute
//!   interfaces:
//!   - mac_addr: de:ad:be:ee:ee:f1
//!     ip_addrs:
//!     - name: internal
//!       ip_addr: 172.16.0.1
//! ```
//!
//! The same document may be given as JSON. A path of `-` reads standard input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Payload loading errors
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unable to read payload from {source_name}: {message}")]
    Read { source_name: String, message: String },

    #[error("unable to parse payload as {format}: {message}")]
    Parse { format: DataFormat, message: String },

    #[error("unknown payload format {0:?} (expected json or yaml)")]
    UnknownFormat(String),
}

/// Supported payload encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// Guess the format from a file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(DataFormat::Json),
            "yaml" | "yml" => Some(DataFormat::Yaml),
            _ => None,
        }
    }

    /// Guess the format from the data itself. JSON documents we accept start
    /// with `{` or `[`; everything else is treated as YAML.
    pub fn sniff(data: &[u8]) -> Self {
        match data.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') | Some(b'[') => DataFormat::Json,
            _ => DataFormat::Yaml,
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Json => write!(f, "json"),
            DataFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for DataFormat {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DataFormat::Json),
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            other => Err(PayloadError::UnknownFormat(other.to_string())),
        }
    }
}

/// The full declarative input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

/// One declared node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub name: String,
    pub nid: i64,
    pub xname: String,
    #[serde(default)]
    pub bmc_mac: String,
    #[serde(default)]
    pub bmc_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmc_fqdn: Option<String>,
    /// Single group label (older payloads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
}

impl NodeSpec {
    /// Effective group labels: `group` first, then `groups`, blanks and
    /// repeats dropped.
    pub fn group_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.group.iter().chain(self.groups.iter()) {
            let label = label.trim();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

/// One declared network interface of a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    pub mac_addr: String,
    #[serde(default)]
    pub ip_addrs: Vec<InterfaceIpSpec>,
}

/// An IP address and the human-readable name of the network it is on (not a
/// subnet or CIDR)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceIpSpec {
    #[serde(default, alias = "network")]
    pub name: String,
    pub ip_addr: String,
}

/// Parse payload bytes in the given format
pub fn parse_payload(data: &[u8], format: DataFormat) -> Result<NodeList, PayloadError> {
    let parsed = match format {
        DataFormat::Json => serde_json::from_slice(data).map_err(|e| e.to_string()),
        DataFormat::Yaml => serde_yaml::from_slice(data).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| PayloadError::Parse { format, message })
}

/// Read a payload from `path` (`-` for standard input). When `format` is
/// `None` it is taken from the file extension, falling back to sniffing the
/// content.
pub async fn read_payload(path: &str, format: Option<DataFormat>) -> Result<NodeList, PayloadError> {
    let data = if path == "-" {
        debug!("payload file was -, reading from stdin");
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .map_err(|e| PayloadError::Read {
                source_name: "stdin".to_string(),
                message: e.to_string(),
            })?;
        buf
    } else {
        debug!("payload file: {}", path);
        tokio::fs::read(path).await.map_err(|e| PayloadError::Read {
            source_name: path.to_string(),
            message: e.to_string(),
        })?
    };

    let format = format
        .or_else(|| DataFormat::from_extension(Path::new(path)))
        .unwrap_or_else(|| DataFormat::sniff(&data));
    debug!("payload format: {}", format);

    let nodes = parse_payload(&data, format)?;
    debug!("read {} nodes", nodes.nodes.len());
    Ok(nodes)
}
