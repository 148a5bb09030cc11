//! Routing decisions.
//!
//! # Pipeline
//! ```text
//! request → extractor (canister id text)
//!         → canister_id::decode (key)
//!         → range index lookup + containment (subnet)
//!         → NodeSelector (node)
//!         → RoutingDecision + response annotations
//! ```
//!
//! Every failure along the way is "no decision". The caller owns the
//! fallback policy, typically [`DecisionEngine::random_route`].

use std::fmt;
use std::sync::Arc;

use crate::routing::canister_id;
use crate::routing::context::{
    RequestContext, CANISTER_ID_ANNOTATION, NODE_ID_ANNOTATION, SUBNET_ID_ANNOTATION,
};
use crate::routing::extractor::{self, RefererQueryPolicy};
use crate::routing::selector::{FastRandom, NodeSelector, RandomSelection, RandomSource};
use crate::table::store::{Snapshot, TableStore};
use crate::table::types::{CanisterKey, NodeId, SubnetId, SubnetType};

/// A resolved route for a canister request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub node_id: NodeId,
    pub subnet_id: SubnetId,
    pub subnet_type: SubnetType,
    pub canister_key: CanisterKey,
}

/// Wire form: `<node>,<subnet>,<type>`.
impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.node_id, self.subnet_id, self.subnet_type)
    }
}

/// Wire form: `<subnet>,<type>,<node>`. The order differs from
/// [`RoutingDecision`] and consumers depend on both.
impl fmt::Display for RandomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.subnet_id, self.subnet_type, self.node_id)
    }
}

/// Why a request got no decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unroutable {
    /// The snapshot the decision ran against has no ranges.
    TableEmpty,
    /// The table is populated but nothing in it serves the request.
    NoRoute,
}

/// Routing decision engine over the shared table store.
#[derive(Debug)]
pub struct DecisionEngine<R: RandomSource = FastRandom> {
    store: Arc<TableStore>,
    referer_policy: RefererQueryPolicy,
    rng: R,
}

impl DecisionEngine<FastRandom> {
    pub fn new(store: Arc<TableStore>, referer_policy: RefererQueryPolicy) -> Self {
        Self::with_random(store, referer_policy, FastRandom)
    }
}

impl<R: RandomSource> DecisionEngine<R> {
    pub fn with_random(store: Arc<TableStore>, referer_policy: RefererQueryPolicy, rng: R) -> Self {
        Self {
            store,
            referer_policy,
            rng,
        }
    }

    /// Canister id for the request, from the first source that has one.
    pub fn infer_canister_id(&self, ctx: &impl RequestContext) -> Option<String> {
        let snapshot = self.store.load();
        extractor::infer_canister_id(ctx, &snapshot.aliases, self.referer_policy)
    }

    /// Canister id from the Host header only.
    pub fn host_canister_id(&self, ctx: &impl RequestContext) -> Option<String> {
        let snapshot = self.store.load();
        extractor::host_canister_id(ctx, &snapshot.aliases)
    }

    pub fn is_table_empty(&self) -> bool {
        self.store.load().table.is_empty()
    }

    /// Resolve the node serving the request's canister.
    ///
    /// On success the subnet id, node id and decoded canister key are
    /// written to the request's annotations.
    pub fn decide(&self, ctx: &mut impl RequestContext) -> Option<RoutingDecision> {
        self.decide_in(&self.store.load(), ctx)
    }

    /// Like [`DecisionEngine::decide`], but reports why there is no
    /// decision. Emptiness is judged on the same snapshot the decision
    /// ran against.
    pub fn resolve(&self, ctx: &mut impl RequestContext) -> Result<RoutingDecision, Unroutable> {
        let snapshot = self.store.load();
        match self.decide_in(&snapshot, ctx) {
            Some(decision) => Ok(decision),
            None if snapshot.table.is_empty() => Err(Unroutable::TableEmpty),
            None => Err(Unroutable::NoRoute),
        }
    }

    fn decide_in(
        &self,
        snapshot: &Snapshot,
        ctx: &mut impl RequestContext,
    ) -> Option<RoutingDecision> {
        let Some(canister_id) =
            extractor::infer_canister_id(&*ctx, &snapshot.aliases, self.referer_policy)
        else {
            tracing::trace!(path = ctx.path(), "No canister id in request");
            return None;
        };

        let table = &snapshot.table;
        if table.is_empty() {
            tracing::trace!("Routing table is empty");
            return None;
        }

        let key = canister_id::decode(&canister_id);
        if !key.is_well_formed() {
            tracing::trace!(canister_id = %canister_id, "Canister id does not decode to a key");
            return None;
        }

        let Some((_, subnet_id)) = table.ranges().find(&key) else {
            tracing::trace!(canister_id = %canister_id, key = %key, "Key falls outside every range");
            return None;
        };

        let subnet_type = table.subnet_type(subnet_id);

        let Some(node_id) = NodeSelector::new(table, &self.rng).select_node(subnet_id) else {
            tracing::trace!(subnet = %subnet_id, "Subnet has no nodes");
            return None;
        };

        ctx.annotate(SUBNET_ID_ANNOTATION, subnet_id.to_string());
        ctx.annotate(NODE_ID_ANNOTATION, node_id.to_string());
        ctx.annotate(CANISTER_ID_ANNOTATION, key.to_string());

        Some(RoutingDecision {
            node_id: node_id.clone(),
            subnet_id: subnet_id.clone(),
            subnet_type,
            canister_key: key,
        })
    }

    /// Wire form of [`DecisionEngine::decide`]; empty when there is no decision.
    pub fn route(&self, ctx: &mut impl RequestContext) -> String {
        self.decide(ctx).map(|d| d.to_string()).unwrap_or_default()
    }

    /// A random subnet and node, ignoring the request entirely.
    pub fn random_decision(&self) -> Option<RandomSelection> {
        let snapshot = self.store.load();
        NodeSelector::new(&snapshot.table, &self.rng).select_random_subnet_and_node()
    }

    /// Wire form of [`DecisionEngine::random_decision`]; empty on a dead end.
    pub fn random_route(&self) -> String {
        self.random_decision()
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}
