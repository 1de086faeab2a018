//! Hot reload of the gate configuration file.
//!
//! Every create/modify event triggers a full load and validation; only
//! configs that pass are forwarded to the server. A file that fails to
//! load leaves the running gates untouched.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GateServiceConfig;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Feeds reloaded gate configurations to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GateServiceConfig>,
}

impl ConfigWatcher {
    /// Create a watcher and the receiver the server reloads from.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GateServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let mut handle = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                self.on_event(res);
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;
        handle.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Gate config watcher started");
        Ok(handle)
    }

    /// Reload on writes; returns whether a new config was forwarded.
    fn on_event(&self, res: notify::Result<Event>) -> bool {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = ?e, "Watch error");
                return false;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return false;
        }

        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = ?self.path, error = %e, "Rejected gate config, keeping current gates");
                return false;
            }
        };

        tracing::info!(path = ?self.path, gates = config.gates.len(), "Gate config reloaded from disk");
        self.update_tx.send(config).is_ok()
    }
}
