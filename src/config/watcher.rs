//! Hot reload on config file changes.
//!
//! The parent directory is watched rather than the file itself, so editors that
//! save by writing a temp file and renaming it over the original still trigger a
//! reload.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::shared::SharedConfig;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Reloads a [`SharedConfig`] whenever its backing file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    config: SharedConfig,
}

impl ConfigWatcher {
    pub fn new(path: &Path, config: SharedConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            config,
        }
    }

    /// Start watching. Events arrive on a notify thread; watching stops when
    /// the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let path = self.path.clone();
        let config = self.config;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_file && is_content_change(&event.kind) {
                        tracing::info!(path = %path.display(), "Config file changed, reloading");
                        config.reload_from_file(&path);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}
