// Copyright (c) 2025 - Cowboy AI, Inc.

//! HTTP Inventory Store
//!
//! [`InventoryStore`] over the state manager's REST API.
//!
//! ```rust,no_run
//! use inventory_discover::store::{HttpInventoryStore, StoreConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig {
//!         base_url: "https://demo.openchami.cluster:8443".to_string(),
//!         token: Some("your-token-here".to_string()),
//!         ..Default::default()
//!     };
//!
//!     let store = HttpInventoryStore::new(config).await?;
//!     store.health_check().await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{header, Certificate, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::routes::HttpRequest;
use super::{InventoryResource, InventoryStore, ItemOutcome, StoreError, StoreResult, WriteVerb};

/// Path prefix of the state manager service
pub const BASE_PATH: &str = "/hsm/v2";

/// Readiness endpoint, relative to [`BASE_PATH`]
pub const PATH_READY: &str = "/service/ready";

/// Connection settings for the state manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Scheme, host and port, without the service path
    pub base_url: String,

    /// Bearer token; requests are sent unauthenticated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Extra PEM root certificate to trust
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:27779".to_string(),
            token: None,
            timeout_secs: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

/// State manager client
pub struct HttpInventoryStore {
    config: StoreConfig,
    client: Client,
}

impl HttpInventoryStore {
    /// Build the HTTP client. Nothing is sent until the first call.
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!("Using state manager at {}{}", config.base_url, BASE_PATH);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        match &config.token {
            Some(token) if !token.is_empty() => {
                let mut value: header::HeaderValue = format!("Bearer {}", token)
                    .parse()
                    .map_err(|e| StoreError::Request(format!("invalid access token: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
            _ => warn!("No access token set, requests will be unauthenticated"),
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers);

        if config.insecure {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = &config.ca_cert {
            debug!("Trusting CA certificate {}", path.display());
            let pem = tokio::fs::read(path).await.map_err(|e| {
                StoreError::Request(format!("failed to read CA certificate {}: {}", path.display(), e))
            })?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| StoreError::Request(format!("invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| StoreError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url.trim_end_matches('/'), BASE_PATH, path)
    }

    /// Check the readiness endpoint
    pub async fn health_check(&self) -> StoreResult<()> {
        let url = self.url(PATH_READY);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("readiness check failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!("State manager readiness check passed");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Unsuccessful {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn send(&self, request: &HttpRequest) -> StoreResult<()> {
        let url = self.url(&request.path);
        debug!("{} {}", request.method, url);

        let response = self
            .client
            .request(request.method.clone(), &url)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            Err(StoreError::Conflict {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(StoreError::Unsuccessful {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl InventoryStore for HttpInventoryStore {
    async fn write<R>(&self, verb: WriteVerb, items: &[R]) -> StoreResult<Vec<ItemOutcome>>
    where
        R: InventoryResource,
    {
        let planned = R::plan(verb, items)?;
        let mut outcomes = Vec::with_capacity(planned.len());

        for plan in planned {
            let result = match &plan.request {
                Ok(request) => self.send(request).await,
                Err(e) => Err(e.clone()),
            };
            if let Err(e) = &result {
                debug!(collection = %R::COLLECTION, id = %plan.target, "{} failed: {}", verb, e);
            }
            outcomes.push(ItemOutcome {
                target: plan.target,
                result,
            });
        }

        Ok(outcomes)
    }
}
