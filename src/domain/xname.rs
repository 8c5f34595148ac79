// Copyright (c) 2025 - Cowboy AI, Inc.
//! Xname Value Object
//!
//! An xname is the location-derived identifier of a physical component, e.g.
//! `x1000c1s7b0n0` (cabinet 1000, chassis 1, slot 7, BMC 0, node 0). The
//! inventory uses it as the primary key for components and redfish endpoints.
//!
//! Only the node (`x#c#s#b#n#`) and node BMC (`x#c#s#b#`) shapes are
//! recognised; other identifiers are accepted as opaque ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Xname validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XnameError {
    #[error("Xname is empty")]
    Empty,

    #[error("Invalid character {1:?} in xname {0:?}")]
    InvalidCharacter(String, char),
}

/// Shape of an xname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XnameKind {
    /// `x#c#s#b#n#`
    Node,
    /// `x#c#s#b#`
    NodeBmc,
    /// Anything else
    Other,
}

/// Validated component identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Xname(String);

impl Xname {
    /// Create a new xname
    ///
    /// # Invariants
    /// - Non-empty
    /// - No whitespace or `/` (it is used as a URL path segment)
    pub fn new(xname: impl Into<String>) -> Result<Self, XnameError> {
        let xname = xname.into();
        if xname.is_empty() {
            return Err(XnameError::Empty);
        }
        if let Some(ch) = xname.chars().find(|c| c.is_whitespace() || *c == '/') {
            return Err(XnameError::InvalidCharacter(xname, ch));
        }
        Ok(Self(xname))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the xname by its ordinal segments
    pub fn kind(&self) -> XnameKind {
        match ordinal_prefixes(&self.0.to_ascii_lowercase()).as_deref() {
            Some("xcsbn") => XnameKind::Node,
            Some("xcsb") => XnameKind::NodeBmc,
            _ => XnameKind::Other,
        }
    }
}

/// Collapse `x1000c1s7b0n0` to `xcsbn`; `None` if any letter is not followed
/// by at least one digit or the string does not alternate letter/digits.
fn ordinal_prefixes(s: &str) -> Option<String> {
    let mut letters = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_ascii_lowercase() {
            return None;
        }
        let mut digits = 0;
        while chars.peek().is_some_and(|d| d.is_ascii_digit()) {
            chars.next();
            digits += 1;
        }
        if digits == 0 {
            return None;
        }
        letters.push(c);
    }
    Some(letters)
}

impl fmt::Display for Xname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Xname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
