//! Routing table subsystem.
//!
//! # Data Flow
//! ```text
//! routes JSON / aliases JSON
//!     → loader.rs (read & deserialize)
//!     → routing_table.rs / range_index.rs (validation)
//!     → store.rs (Snapshot published via atomic swap)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new table
//!     → TableUpdate sent to publisher task
//!     → store.rs swaps in new Snapshot
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once built; a reload replaces them wholesale
//! - Validation happens once, at construction, never per request
//! - An empty table is a valid state

pub mod alias;
pub mod error;
pub mod loader;
pub mod range_index;
pub mod routing_table;
pub mod store;
pub mod types;
pub mod watcher;

pub use alias::AliasTable;
pub use error::TableError;
pub use range_index::SubnetRangeIndex;
pub use routing_table::{RoutingTable, RoutingTableFile};
pub use store::{Snapshot, TableStore, TableUpdate};
pub use types::{CanisterKey, NodeId, SubnetId, SubnetType};
