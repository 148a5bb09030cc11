//! Canister id aliases.
//!
//! Maps a human-friendly host label (e.g. `nns`) to the canonical textual
//! canister id it stands for. Lookups are exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Canonical id for `alias`, if one is registered.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<(String, String)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_exact() {
        let aliases: AliasTable = serde_json::from_str(
            r#"{"nns": "qoctq-giaaa-aaaaa-aaaea-cai"}"#,
        )
        .unwrap();
        assert_eq!(aliases.resolve("nns"), Some("qoctq-giaaa-aaaaa-aaaea-cai"));
        assert_eq!(aliases.resolve("NNS"), None);
        assert_eq!(aliases.len(), 1);
    }
}
