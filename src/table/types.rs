//! Identifier types shared by the routing table and the decision engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a subnet (a shard of the network).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubnetId(pub String);

/// Identifier of a single node (backend endpoint) inside a subnet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Decoded ordinal form of a canister id.
///
/// Keys compare as strings. Two keys of different length are still ordered
/// lexicographically, which is what the range table is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanisterKey(pub String);

impl CanisterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every character is a lowercase hex digit.
    ///
    /// Keys decoded from text containing characters outside the id alphabet
    /// carry a non-hex marker and are not well formed.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

/// Normalized subnet type.
///
/// Only the literal values `application` and `system` are recognized; any
/// other raw value, including a missing one, becomes [`SubnetType::Unrecognized`]
/// and renders as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetType {
    Application,
    System,
    Unrecognized,
}

impl SubnetType {
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("application") => SubnetType::Application,
            Some("system") => SubnetType::System,
            _ => SubnetType::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetType::Application => "application",
            SubnetType::System => "system",
            SubnetType::Unrecognized => "",
        }
    }
}

macro_rules! display_inner {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $ty {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }
        )*
    };
}

display_inner!(SubnetId, NodeId, CanisterKey);

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
