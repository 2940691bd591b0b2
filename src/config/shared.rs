//! Shared, mutable runtime configuration.
//!
//! # Responsibilities
//! - Single source of truth for the settings read by HTTP handlers
//! - Field-scoped writes from watchers and admin endpoints
//! - Hot reload by merging a fresh file over the current record
//!
//! # Design Decisions
//! - One `RwLock` behind a cloneable handle; the lock itself is never exposed
//! - Accessors copy out what they need and release before returning
//! - No I/O happens under the lock
//! - A poisoned lock is recovered: every write leaves the record whole

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::loader::load_config;
use crate::config::schema::{ConfigFile, Settings};
use crate::store::{CheckRequest, KvRequest};

/// Handle to the process-wide settings. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<Settings>>,
}

impl SharedConfig {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the whole record.
    pub fn snapshot(&self) -> Settings {
        self.read().clone()
    }

    pub fn language(&self) -> String {
        self.read().language.clone()
    }

    pub fn checks_enabled(&self) -> bool {
        self.read().enable_checks
    }

    pub fn service_name(&self) -> String {
        self.read().service_name.clone()
    }

    pub fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        self.write().language = language;
    }

    pub fn set_checks_enabled(&self, enabled: bool) {
        self.write().enable_checks = enabled;
    }

    /// Build the blocking read for `key` at `index` from the current store settings.
    pub fn kv_request(&self, key: &str, index: u64) -> KvRequest {
        let settings = self.read();
        KvRequest {
            address: settings.consul_addr.clone(),
            kv_path: settings.kv_path.clone(),
            key: key.to_string(),
            index,
            wait: settings.watch_wait,
        }
    }

    /// The TTL check to mark passing, or `None` while checks are disabled.
    pub fn heartbeat_target(&self) -> Option<CheckRequest> {
        let settings = self.read();
        settings.enable_checks.then(|| CheckRequest {
            address: settings.consul_addr.clone(),
            endpoint: settings.ttl_endpoint.clone(),
            check_id: settings.ttl_id.clone(),
        })
    }

    /// Merge `fresh` over the current record. Returns the names of changed
    /// fields that only take effect after a restart.
    pub fn reload(&self, fresh: ConfigFile) -> Vec<&'static str> {
        let mut settings = self.write();
        let merged = fresh.merge(ConfigFile::from(settings.clone())).finalize();
        let restart_required = restart_required(&settings, &merged);
        *settings = merged;
        restart_required
    }

    /// Load `path` and merge it in. A load failure keeps the current record.
    pub fn reload_from_file(&self, path: &Path) {
        match load_config(path) {
            Ok(fresh) => {
                let pending = self.reload(fresh);
                tracing::info!(path = %path.display(), "Configuration reloaded");
                if !pending.is_empty() {
                    tracing::warn!(
                        fields = ?pending,
                        "Changed fields take effect after restart"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to reload config, keeping current configuration"
                );
            }
        }
    }
}

/// Fields read once when the watchers and heartbeat start.
fn restart_required(old: &Settings, new: &Settings) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.keys_to_watch != new.keys_to_watch {
        fields.push("keys_to_watch");
    }
    if old.ttl_interval != new.ttl_interval {
        fields.push("ttl_interval");
    }
    if old.ttl_timeout != new.ttl_timeout {
        fields.push("ttl_timeout");
    }
    if old.watch_rate != new.watch_rate {
        fields.push("watch_rate");
    }
    if old.watch_burst != new.watch_burst {
        fields.push("watch_burst");
    }
    fields
}
