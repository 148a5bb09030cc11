//! Random node selection.
//!
//! # Design Decisions
//! - Uniform draws; no health or load awareness
//! - The random source is injected so tests can force a selection
//! - A dead end (no subnets, no nodes) is reported, never retried

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::table::routing_table::RoutingTable;
use crate::table::types::{NodeId, SubnetId, SubnetType};

/// Source of uniform indices.
pub trait RandomSource: Send + Sync + std::fmt::Debug {
    /// A uniformly drawn index in `[0, len)`. Only called with `len > 0`.
    fn index(&self, len: usize) -> usize;
}

/// Thread-local `fastrand` generator. Cheap, not cryptographically strong.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastRandom;

impl RandomSource for FastRandom {
    fn index(&self, len: usize) -> usize {
        fastrand::usize(..len)
    }
}

/// Seeded generator for reproducible selections.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Always draws the same index (wrapped into range by the selector).
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn index(&self, _len: usize) -> usize {
        self.0
    }
}

fn pick<'a, T>(items: &'a [T], rng: &dyn RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    // Guard against sources that ignore the bound.
    items.get(rng.index(items.len()) % items.len())
}

/// Outcome of the fully random fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSelection {
    pub subnet_id: SubnetId,
    pub subnet_type: SubnetType,
    pub node_id: NodeId,
}

/// Random node selection over one table snapshot.
#[derive(Debug, Clone, Copy)]
pub struct NodeSelector<'a> {
    table: &'a RoutingTable,
    rng: &'a dyn RandomSource,
}

impl<'a> NodeSelector<'a> {
    pub fn new(table: &'a RoutingTable, rng: &'a dyn RandomSource) -> Self {
        Self { table, rng }
    }

    /// A uniformly chosen node of `subnet`.
    pub fn select_node(&self, subnet: &SubnetId) -> Option<&'a NodeId> {
        pick(self.table.nodes_of(subnet), self.rng)
    }

    /// A uniformly chosen subnet of the range table, then one of its nodes.
    pub fn select_random_subnet_and_node(&self) -> Option<RandomSelection> {
        let subnet_id = pick(self.table.distinct_subnets(), self.rng)?;
        let node_id = self.select_node(subnet_id)?;

        Some(RandomSelection {
            subnet_id: subnet_id.clone(),
            subnet_type: self.table.subnet_type(subnet_id),
            node_id: node_id.clone(),
        })
    }
}
