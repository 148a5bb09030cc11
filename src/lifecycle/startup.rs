//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: a table that does not load or validate at startup is fatal
//! - Tables load before the listener binds (traffic only when ready)

use std::path::Path;

use crate::config::TablesConfig;
use crate::table::error::TableResult;
use crate::table::loader::{load_alias_table, load_routing_table};
use crate::table::{AliasTable, Snapshot};

/// Load the initial routing and alias tables named by the config.
pub fn load_snapshot(config: &TablesConfig) -> TableResult<Snapshot> {
    let table = load_routing_table(Path::new(&config.routing_table_path))?;
    let aliases = match &config.alias_table_path {
        Some(path) => load_alias_table(Path::new(path))?,
        None => AliasTable::default(),
    };

    tracing::info!(
        ranges = table.ranges().len(),
        subnets = table.distinct_subnets().len(),
        aliases = aliases.len(),
        "Tables loaded"
    );
    if table.is_empty() {
        tracing::warn!("Routing table is empty; canister requests will not be routed");
    }

    Ok(Snapshot::new(table, aliases))
}
