//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Run the decision pipeline per request and report it
//!
//! # Endpoints
//! - `GET /_/health`: 200 when the routing table has ranges, 503 otherwise
//! - `GET /_/random`: random subnet and node (`<subnet>,<type>,<node>`)
//! - `GET /_/host-canister-id`: canister id named by the Host header
//! - anything else: canister route (`<node>,<subnet>,<type>`) with `x-ic-*`
//!   headers, 404 without a route, 503 while the table is empty

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::context::HttpRequestContext;
use crate::observability::metrics;
use crate::routing::{DecisionEngine, Unroutable};
use crate::table::TableStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
}

/// HTTP front of the routing engine.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the shared table store.
    pub fn new(config: &RouterConfig, store: Arc<TableStore>) -> Self {
        let engine = Arc::new(DecisionEngine::new(
            store,
            config.routing.referer_query_fallback,
        ));
        let router = build_router(
            AppState { engine },
            Duration::from_secs(config.timeouts.request_secs),
        );
        Self { router }
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/_/health", get(health_handler))
        .route("/_/random", get(random_handler))
        .route("/_/host-canister-id", get(host_canister_id_handler))
        .fallback(route_handler)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn table_unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Routing table is empty").into_response()
}

/// Canister route for an arbitrary request.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let mut ctx = HttpRequestContext::new(request.uri(), request.headers());

    match state.engine.resolve(&mut ctx) {
        Ok(decision) => {
            metrics::record_decision("canister", true, start);
            tracing::debug!(
                path = %request.uri().path(),
                subnet = %decision.subnet_id,
                node = %decision.node_id,
                "Request routed"
            );
            (ctx.into_annotations(), decision.to_string()).into_response()
        }
        Err(Unroutable::TableEmpty) => {
            metrics::record_decision("canister", false, start);
            table_unavailable()
        }
        Err(Unroutable::NoRoute) => {
            metrics::record_decision("canister", false, start);
            tracing::debug!(path = %request.uri().path(), "No route for request");
            (StatusCode::NOT_FOUND, "No route for request").into_response()
        }
    }
}

/// Random subnet and node, for requests that name no canister.
async fn random_handler(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let route = state.engine.random_route();
    metrics::record_decision("random", !route.is_empty(), start);

    if route.is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "No subnet with nodes available").into_response();
    }
    route.into_response()
}

async fn health_handler(State(state): State<AppState>) -> Response {
    if state.engine.is_table_empty() {
        return table_unavailable();
    }
    "ok".into_response()
}

async fn host_canister_id_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let ctx = HttpRequestContext::new(&uri, &headers);
    match state.engine.host_canister_id(&ctx) {
        Some(id) => id.into_response(),
        None => (StatusCode::NOT_FOUND, "Host names no canister").into_response(),
    }
}
