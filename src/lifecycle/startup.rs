//! Engine startup and supervision.
//!
//! # Responsibilities
//! - Spawn one watcher per configured key and the TTL heartbeat
//! - Hand each task its own cancellation token
//! - Join every task on shutdown

use std::sync::Arc;
use tokio::task::JoinSet;

use crate::config::SharedConfig;
use crate::health::TtlHeartbeat;
use crate::lifecycle::shutdown::Shutdown;
use crate::store::{CheckEndpoint, KvStore};
use crate::watch::BlockingWatcher;

/// Handles of the running engine tasks.
pub struct Engine {
    tasks: JoinSet<()>,
}

impl Engine {
    /// Number of tasks still owned by the engine.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task to finish. Call after triggering shutdown.
    pub async fn join(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Engine task failed");
            }
        }
        tracing::info!("Engine stopped");
    }
}

/// Start the watchers for `keys_to_watch` and the heartbeat.
pub fn spawn_engine<K, C>(
    kv: Arc<K>,
    checks: Arc<C>,
    config: SharedConfig,
    shutdown: &Shutdown,
) -> Engine
where
    K: KvStore + ?Sized + 'static,
    C: CheckEndpoint + ?Sized + 'static,
{
    let mut tasks = JoinSet::new();

    for key in config.snapshot().keys_to_watch {
        let watcher = BlockingWatcher::new(key, kv.clone(), config.clone());
        tracing::debug!(key = watcher.key(), "Spawning watcher");
        tasks.spawn(watcher.run(shutdown.subscribe()));
    }

    let heartbeat = TtlHeartbeat::new(checks, config);
    tasks.spawn(heartbeat.run(shutdown.subscribe()));

    tracing::info!(tasks = tasks.len(), "Engine started");
    Engine { tasks }
}
