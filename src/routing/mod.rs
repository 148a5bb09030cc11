//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, host, query, referer)
//!     → extractor.rs (canister id text)
//!     → canister_id.rs (decode to ordinal key)
//!     → table range index (subnet)
//!     → selector.rs (node)
//!     → engine.rs (decision + annotations)
//! ```
//!
//! # Design Decisions
//! - Pure, synchronous, CPU-only: no I/O and no locks on the hot path
//! - One table snapshot per decision
//! - Every failure is "no decision", never an error

pub mod canister_id;
pub mod context;
pub mod engine;
pub mod extractor;
pub mod selector;

pub use context::{RequestContext, SimpleRequest};
pub use engine::{DecisionEngine, RoutingDecision, Unroutable};
pub use extractor::RefererQueryPolicy;
pub use selector::{FastRandom, NodeSelector, RandomSelection, RandomSource, SeededRandom};
