//! Table file watcher for hot reload.
//!
//! Watches the directories holding the routing and alias tables, reloads a
//! table when its file changes and hands the validated result to the
//! publisher task. A table that fails to load is logged and the current
//! snapshot stays in place.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

use crate::observability::metrics;
use crate::table::loader::{load_alias_table, load_routing_table};
use crate::table::store::{TableStore, TableUpdate};

/// A watcher that monitors the table files for changes.
pub struct TableWatcher {
    routes_path: PathBuf,
    aliases_path: Option<PathBuf>,
    update_tx: mpsc::UnboundedSender<TableUpdate>,
}

impl TableWatcher {
    /// Create a new TableWatcher.
    ///
    /// Returns the watcher and a receiver for table updates.
    pub fn new(
        routes_path: &Path,
        aliases_path: Option<&Path>,
    ) -> (Self, mpsc::UnboundedReceiver<TableUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                routes_path: routes_path.to_path_buf(),
                aliases_path: aliases_path.map(Path::to_path_buf),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in the background.
    ///
    /// The returned handle must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let routes_path = self.routes_path.clone();
        let aliases_path = self.aliases_path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if touches(&event, &routes_path) {
                        reload_routes(&routes_path, &tx);
                    }
                    if let Some(aliases_path) = &aliases_path {
                        if touches(&event, aliases_path) {
                            reload_aliases(aliases_path, &tx);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Tables are usually replaced by rename, so watch the directory.
        for dir in self.watch_dirs() {
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(
            routes = ?self.routes_path,
            aliases = ?self.aliases_path,
            "Table watcher started"
        );
        Ok(watcher)
    }

    fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = std::iter::once(&self.routes_path)
            .chain(self.aliases_path.as_ref())
            .map(|p| parent_dir(p))
            .collect();
        dirs.dedup();
        dirs
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches(event: &Event, path: &Path) -> bool {
    match path.file_name() {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => false,
    }
}

fn reload_routes(path: &Path, tx: &mpsc::UnboundedSender<TableUpdate>) {
    tracing::info!(path = %path.display(), "Routing table change detected, reloading...");
    match load_routing_table(path) {
        Ok(table) => {
            let _ = tx.send(TableUpdate::Routes(table));
        }
        Err(e) => {
            metrics::record_table_reload("routes", false);
            tracing::error!("Failed to reload routing table: {}. Keeping current table.", e);
        }
    }
}

fn reload_aliases(path: &Path, tx: &mpsc::UnboundedSender<TableUpdate>) {
    tracing::info!(path = %path.display(), "Alias table change detected, reloading...");
    match load_alias_table(path) {
        Ok(aliases) => {
            let _ = tx.send(TableUpdate::Aliases(aliases));
        }
        Err(e) => {
            metrics::record_table_reload("aliases", false);
            tracing::error!("Failed to reload alias table: {}. Keeping current table.", e);
        }
    }
}

/// Publish incoming updates until the channel closes or shutdown fires.
pub async fn apply_updates(
    store: Arc<TableStore>,
    mut updates: mpsc::UnboundedReceiver<TableUpdate>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                let table = match &update {
                    TableUpdate::Routes(_) => "routes",
                    TableUpdate::Aliases(_) => "aliases",
                };
                store.apply(update);
                metrics::record_table_reload(table, true);
                metrics::record_table_size(&store.load().table);
                tracing::info!(table, "Table snapshot published");
            }
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Table update task stopped");
}
