//! TTL check heartbeat.
//!
//! # Responsibilities
//! - Periodically mark the service's TTL check as passing
//! - Skip ticks while checks are disabled

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::{SharedConfig, Settings};
use crate::observability::metrics;
use crate::store::CheckEndpoint;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Disabled,
    Passed,
    Rejected(u16),
    Failed,
    TimedOut,
}

impl TickOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Disabled => "disabled",
            TickOutcome::Passed => "passed",
            TickOutcome::Rejected(_) => "rejected",
            TickOutcome::Failed => "failed",
            TickOutcome::TimedOut => "timeout",
        }
    }
}

pub struct TtlHeartbeat<E: ?Sized> {
    endpoint: Arc<E>,
    config: SharedConfig,
    interval: Duration,
    timeout: Duration,
}

impl<E: CheckEndpoint + ?Sized> TtlHeartbeat<E> {
    /// Create a heartbeat. Interval and timeout are read once, here.
    pub fn new(endpoint: Arc<E>, config: SharedConfig) -> Self {
        let settings = config.snapshot();
        let defaults = Settings::default();
        let non_zero = |value: Duration, fallback: Duration| {
            if value.is_zero() {
                fallback
            } else {
                value
            }
        };

        Self {
            endpoint,
            interval: non_zero(settings.ttl_interval, defaults.ttl_interval),
            timeout: non_zero(settings.ttl_timeout, defaults.ttl_timeout),
            config,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick until `shutdown` is cancelled. The first tick fires immediately.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(interval = ?self.interval, "Running TTL check keep-alive");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = self.tick() => outcome,
            };
            metrics::record_heartbeat(outcome.label());
        }

        tracing::info!("TTL heartbeat stopped");
    }

    /// Send at most one pass for the current config.
    pub async fn tick(&self) -> TickOutcome {
        let Some(request) = self.config.heartbeat_target() else {
            tracing::debug!("Health checks disabled, skipping TTL update");
            return TickOutcome::Disabled;
        };

        match time::timeout(self.timeout, self.endpoint.pass_check(&request)).await {
            Ok(Ok(200)) => {
                tracing::debug!(check_id = %request.check_id, "TTL check passed");
                TickOutcome::Passed
            }
            Ok(Ok(status)) => {
                tracing::warn!(check_id = %request.check_id, status, "Failed to update TTL check: non-200 status");
                TickOutcome::Rejected(status)
            }
            Ok(Err(e)) => {
                tracing::error!(check_id = %request.check_id, error = %e, "Failed to update TTL check");
                TickOutcome::Failed
            }
            Err(_) => {
                tracing::warn!(check_id = %request.check_id, timeout = ?self.timeout, "Failed to update TTL check: timeout");
                TickOutcome::TimedOut
            }
        }
    }
}
