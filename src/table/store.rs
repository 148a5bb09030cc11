//! Hot-swappable table snapshots.
//!
//! Readers load one [`Snapshot`] per decision and keep it for the whole
//! pipeline. Reloads build a complete new snapshot and publish it with a
//! single atomic swap, so a decision never sees half of an update.

use arc_swap::{ArcSwap, Guard};
use std::sync::Arc;

use crate::table::alias::AliasTable;
use crate::table::routing_table::RoutingTable;

/// Routing table and alias table published together.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub table: Arc<RoutingTable>,
    pub aliases: Arc<AliasTable>,
}

impl Snapshot {
    pub fn new(table: RoutingTable, aliases: AliasTable) -> Self {
        Self {
            table: Arc::new(table),
            aliases: Arc::new(aliases),
        }
    }
}

/// A freshly loaded table waiting to be published.
#[derive(Debug)]
pub enum TableUpdate {
    Routes(RoutingTable),
    Aliases(AliasTable),
}

/// Lock-free holder of the current snapshot.
#[derive(Debug, Default)]
pub struct TableStore {
    current: ArcSwap<Snapshot>,
}

impl TableStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Borrow the current snapshot.
    pub fn load(&self) -> Guard<Arc<Snapshot>> {
        self.current.load()
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Swap in one table, keeping the other from the current snapshot.
    pub fn apply(&self, update: TableUpdate) {
        let update = match update {
            TableUpdate::Routes(table) => Replace::Routes(Arc::new(table)),
            TableUpdate::Aliases(aliases) => Replace::Aliases(Arc::new(aliases)),
        };
        self.current.rcu(|current| {
            let mut next = Snapshot::clone(current);
            match &update {
                Replace::Routes(table) => next.table = table.clone(),
                Replace::Aliases(aliases) => next.aliases = aliases.clone(),
            }
            next
        });
    }
}

enum Replace {
    Routes(Arc<RoutingTable>),
    Aliases(Arc<AliasTable>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::routing_table::RoutingTableFile;

    fn one_range_table() -> RoutingTable {
        RoutingTable::build(RoutingTableFile {
            canister_range_starts: vec!["10".into()],
            canister_range_ends: vec!["20".into()],
            canister_subnets: vec!["s1".into()],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_apply_replaces_one_side() {
        let store = TableStore::default();
        assert!(store.load().table.is_empty());

        let before = store.snapshot();
        store.apply(TableUpdate::Routes(one_range_table()));
        let after = store.snapshot();

        assert!(!after.table.is_empty());
        assert!(Arc::ptr_eq(&before.aliases, &after.aliases));
        // Earlier readers keep their own snapshot.
        assert!(before.table.is_empty());

        store.apply(TableUpdate::Aliases(
            [("foo".to_string(), "bar".to_string())].into_iter().collect(),
        ));
        let last = store.snapshot();
        assert!(Arc::ptr_eq(&after.table, &last.table));
        assert_eq!(last.aliases.resolve("foo"), Some("bar"));
    }
}
