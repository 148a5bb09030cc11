//! Table loading from disk.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::table::alias::AliasTable;
use crate::table::error::{TableError, TableResult};
use crate::table::routing_table::{RoutingTable, RoutingTableFile};

fn read_json<T: DeserializeOwned>(path: &Path) -> TableResult<T> {
    let content = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate a routing table from a JSON file.
pub fn load_routing_table(path: &Path) -> TableResult<RoutingTable> {
    let file: RoutingTableFile = read_json(path)?;
    let table = RoutingTable::build(file)?;
    tracing::debug!(
        path = %path.display(),
        ranges = table.ranges().len(),
        subnets = table.distinct_subnets().len(),
        "Routing table loaded"
    );
    Ok(table)
}

/// Load the alias table from a JSON object file.
pub fn load_alias_table(path: &Path) -> TableResult<AliasTable> {
    let aliases: AliasTable = read_json(path)?;
    tracing::debug!(path = %path.display(), aliases = aliases.len(), "Alias table loaded");
    Ok(aliases)
}
