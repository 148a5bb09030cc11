//! Boundary router
//!
//! Decides, for every request reaching the boundary, which subnet and which
//! node should serve it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌────────────┐    ┌────────────┐
//!     ───────────────────▶│   http   │───▶│  routing   │───▶│  selector  │
//!                         │  server  │    │  extractor │    │  (random)  │
//!                         └──────────┘    │  + decode  │    └─────┬──────┘
//!                                         └─────┬──────┘          │
//!                                               ▼                 ▼
//!                                         ┌───────────────────────────┐
//!     routes.json / aliases.json ────────▶│ table store (ArcSwap)     │
//!          (watched, hot reload)          └───────────────────────────┘
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;

use boundary_router::config::load_or_default;
use boundary_router::http::HttpServer;
use boundary_router::lifecycle::{signals, startup, Shutdown};
use boundary_router::observability::{logging, metrics};
use boundary_router::table::watcher::{apply_updates, TableWatcher};
use boundary_router::table::TableStore;

#[derive(Parser)]
#[command(name = "boundary-router")]
#[command(about = "Routes canister requests to subnets and nodes", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load configuration and tables, print a summary and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!("boundary-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routing_table = %config.tables.routing_table_path,
        referer_query_fallback = ?config.routing.referer_query_fallback,
        "Configuration loaded"
    );

    let snapshot = startup::load_snapshot(&config.tables)?;

    if cli.check {
        println!(
            "ok: {} ranges, {} subnets, {} aliases",
            snapshot.table.ranges().len(),
            snapshot.table.distinct_subnets().len(),
            snapshot.aliases.len()
        );
        return Ok(());
    }

    let store = Arc::new(TableStore::new(snapshot));
    let shutdown = Shutdown::new();

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
            metrics::record_table_size(&store.load().table);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Kept alive for the lifetime of the process.
    let _watcher = if config.tables.watch {
        let (watcher, updates) = TableWatcher::new(
            Path::new(&config.tables.routing_table_path),
            config.tables.alias_table_path.as_deref().map(Path::new),
        );
        let handle = watcher.run()?;
        tokio::spawn(apply_updates(store.clone(), updates, shutdown.subscribe()));
        Some(handle)
    } else {
        None
    };

    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
