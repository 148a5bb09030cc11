//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → context.rs (request view for the decision pipeline)
//!     → routing engine decides subnet and node
//!     → decision written to the response body and x-ic-* headers
//! ```

pub mod context;
pub mod server;

pub use context::HttpRequestContext;
pub use server::{build_router, AppState, HttpServer};
