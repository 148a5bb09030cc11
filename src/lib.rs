//! Boundary router: per-request subnet and node selection for canister traffic.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod table;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{DecisionEngine, RoutingDecision};
pub use table::{RoutingTable, TableStore};
