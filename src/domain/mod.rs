// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Value Objects
//!
//! Validated building blocks the resource compiler relies on:
//!
//! - [`Xname`] - component identifier (`x#c#s#b#n#`)
//! - [`MacAddress`] - 48-bit MAC address validation
//! - [`parse_ip`] - IPv4/IPv6 address validation

pub mod network;
pub mod xname;

pub use network::{parse_ip, MacAddress, NetworkError};
pub use xname::{Xname, XnameError, XnameKind};
