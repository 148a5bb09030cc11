//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use boundary_router::routing::selector::FixedIndex;
use boundary_router::routing::{DecisionEngine, RefererQueryPolicy};
use boundary_router::table::{AliasTable, RoutingTable, RoutingTableFile, Snapshot, TableStore};

/// Key 00000000000000000101, inside the first range.
pub const S1_CANISTER: &str = "rwlgt-iiaaa-aaaaa-aaaaa-cai";
/// Key 00000000000000100101, inside the first range; reachable as alias `foo`.
pub const S1_ALIASED: &str = "sgymv-uiaaa-aaaaa-aaaia-cai";
/// Key 00000000002000050101, inside the second range.
pub const S2_CANISTER: &str = "jkoii-tqaaa-aaaab-aaacq-cai";
/// Key 00000000004000000101, exactly the start of the third range.
pub const S3_CANISTER: &str = "2vstd-2aaaa-aaaac-aaaaa-cai";
/// Key 00000000001000000101, in the gap between the first two ranges.
pub const GAP_CANISTER: &str = "5v3p4-iyaaa-aaaaa-qaaaa-cai";

/// Three ranges on three subnets with a gap after the first.
pub fn routes_json() -> serde_json::Value {
    serde_json::json!({
        "canister_range_starts": [
            "00000000000000000101",
            "00000000002000000101",
            "00000000004000000101"
        ],
        "canister_range_ends": [
            "00000000000fffff0101",
            "00000000002fffff0101",
            "00000000004fffff0101"
        ],
        "canister_subnets": ["S1", "S2", "S3"],
        "subnet_node_ids": {
            "S1": ["N1"],
            "S2": ["N2a", "N2b"],
            "S3": ["N3"]
        },
        "subnet_types": {
            "S1": "application",
            "S2": "system",
            "S3": "unknown-type"
        }
    })
}

pub fn routing_table() -> RoutingTable {
    let file: RoutingTableFile = serde_json::from_value(routes_json()).unwrap();
    RoutingTable::build(file).unwrap()
}

pub fn aliases() -> AliasTable {
    [("foo".to_string(), S1_ALIASED.to_string())]
        .into_iter()
        .collect()
}

pub fn store() -> Arc<TableStore> {
    Arc::new(TableStore::new(Snapshot::new(routing_table(), aliases())))
}

pub fn empty_store() -> Arc<TableStore> {
    Arc::new(TableStore::default())
}

/// Engine that always picks the first candidate.
pub fn engine(store: Arc<TableStore>) -> DecisionEngine<FixedIndex> {
    DecisionEngine::with_random(store, RefererQueryPolicy::Skip, FixedIndex(0))
}

pub fn subnet_nodes() -> HashMap<&'static str, Vec<&'static str>> {
    HashMap::from([("S1", vec!["N1"]), ("S2", vec!["N2a", "N2b"]), ("S3", vec!["N3"])])
}
