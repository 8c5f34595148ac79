// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for discovery setup
//!
//! Anything in here aborts the command before reconciliation begins. Per-item
//! store failures are not errors at this level; they are collected in the
//! [`DiscoveryReport`](crate::outcome::DiscoveryReport).

use thiserror::Error;

use crate::compile::CompileError;
use crate::config::ConfigError;
use crate::payload::PayloadError;
use crate::store::StoreError;

/// Errors that abort a discovery run
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// Payload could not be read or parsed
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Payload parsed but describes an invalid node set
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Configuration or cluster selection failed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Store client could not be built or the store is unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Result type for discovery setup
pub type DiscoverResult<T> = Result<T, DiscoverError>;

impl From<StoreError> for DiscoverError {
    fn from(err: StoreError) -> Self {
        DiscoverError::StoreUnavailable(err.to_string())
    }
}
