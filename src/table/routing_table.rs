//! Routing table snapshot.
//!
//! # Data Flow
//! ```text
//! routes JSON file
//!     → RoutingTableFile (serde, every column optional)
//!     → RoutingTable::build (range validation)
//!     → RoutingTable (immutable, shared via Arc)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::table::error::TableResult;
use crate::table::range_index::SubnetRangeIndex;
use crate::table::types::{CanisterKey, NodeId, SubnetId, SubnetType};

/// On-disk layout of the routing table.
///
/// Missing columns deserialize as empty, so `{}` is a valid (empty) table.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingTableFile {
    pub canister_range_starts: Vec<CanisterKey>,
    pub canister_range_ends: Vec<CanisterKey>,
    pub canister_subnets: Vec<SubnetId>,
    pub subnet_node_ids: HashMap<SubnetId, Vec<NodeId>>,
    pub subnet_types: HashMap<SubnetId, String>,
}

/// Validated, immutable routing table.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    ranges: SubnetRangeIndex,
    nodes: HashMap<SubnetId, Vec<NodeId>>,
    types: HashMap<SubnetId, String>,
    /// Distinct subnets of the range table in first-appearance order.
    subnets: Vec<SubnetId>,
}

impl RoutingTable {
    /// Validate the raw columns and build a table.
    pub fn build(file: RoutingTableFile) -> TableResult<Self> {
        let ranges = SubnetRangeIndex::build(
            file.canister_range_starts,
            file.canister_range_ends,
            file.canister_subnets,
        )?;

        let subnets = {
            let mut seen = HashSet::new();
            ranges
                .subnets()
                .iter()
                .filter(|subnet| seen.insert(*subnet))
                .cloned()
                .collect()
        };

        Ok(Self {
            ranges,
            nodes: file.subnet_node_ids,
            types: file.subnet_types,
            subnets,
        })
    }

    /// A table with no ranges at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the table carries no range data, so no id can be routed.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &SubnetRangeIndex {
        &self.ranges
    }

    /// Nodes of a subnet; empty when the subnet is unknown.
    pub fn nodes_of(&self, subnet: &SubnetId) -> &[NodeId] {
        self.nodes.get(subnet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subnet_type(&self, subnet: &SubnetId) -> SubnetType {
        SubnetType::normalize(self.types.get(subnet).map(String::as_str))
    }

    pub fn distinct_subnets(&self) -> &[SubnetId] {
        &self.subnets
    }
}
