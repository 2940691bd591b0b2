//! Blocking-query watcher for a single key.
//!
//! # States
//! ```text
//! WAITING_FOR_TOKEN → POLLING → APPLY | RESET | RETRY → WAITING_FOR_TOKEN ...
//! ```
//!
//! Runs until its cancellation token fires. No failure ends the loop.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::SharedConfig;
use crate::observability::metrics;
use crate::resilience::RateLimiter;
use crate::store::{decode_entries, ChangeIndex, KvStore};
use crate::watch::cursor::{Advance, WatchCursor};
use crate::watch::dispatch::{ConfigUpdate, DispatchTable};

/// Pause before waiting on a starved limiter again.
const LIMITER_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Why a poll produced no update and will simply be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// Transport failure or non-2xx status. Cursor untouched.
    Store,
    /// Unparseable index header. Cursor untouched.
    MalformedIndex,
    /// Body was not a JSON entry list. Cursor advanced.
    MalformedBody,
    /// Value was not valid base64. Cursor advanced.
    MalformedValue,
    /// Value did not decode for the key's field. Cursor advanced.
    InvalidPayload,
}

/// What a single poll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The value was written to the shared config.
    Applied(ConfigUpdate),
    /// The value decoded but the key has no dispatch rule.
    Ignored(String),
    /// The store has no entry for the key yet.
    KeyMissing,
    /// The index went backwards or to zero; payload discarded.
    Reset,
    Retry(RetryReason),
}

impl PollOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Applied(_) => "applied",
            PollOutcome::Ignored(_) => "ignored",
            PollOutcome::KeyMissing => "key_missing",
            PollOutcome::Reset => "reset",
            PollOutcome::Retry(RetryReason::Store) => "store_error",
            PollOutcome::Retry(RetryReason::MalformedIndex) => "malformed_index",
            PollOutcome::Retry(RetryReason::MalformedBody) => "malformed_body",
            PollOutcome::Retry(RetryReason::MalformedValue) => "malformed_value",
            PollOutcome::Retry(RetryReason::InvalidPayload) => "invalid_payload",
        }
    }
}

/// Long-poll loop for one key.
pub struct BlockingWatcher<S: ?Sized> {
    key: String,
    store: Arc<S>,
    config: SharedConfig,
    cursor: WatchCursor,
    limiter: RateLimiter,
}

impl<S: KvStore + ?Sized> BlockingWatcher<S> {
    /// Create a watcher. Poll limits are read from the config once, here.
    pub fn new(key: impl Into<String>, store: Arc<S>, config: SharedConfig) -> Self {
        let settings = config.snapshot();
        Self {
            key: key.into(),
            store,
            config,
            cursor: WatchCursor::new(),
            limiter: RateLimiter::new(settings.watch_rate, settings.watch_burst),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cursor(&self) -> WatchCursor {
        self.cursor
    }

    /// Poll until `shutdown` is cancelled. In-flight waits and queries are dropped.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(key = %self.key, "Running watch for key");

        loop {
            let acquired = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                acquired = self.limiter.acquire() => acquired,
            };

            if let Err(e) = acquired {
                tracing::error!(key = %self.key, error = %e, "Failed to wait for limiter");
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = sleep(LIMITER_RETRY_DELAY) => continue,
                }
            }

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = self.poll_once() => outcome,
            };
            metrics::record_poll(&self.key, outcome.label());
        }

        tracing::info!(key = %self.key, index = self.cursor.index(), "Watch stopped");
    }

    /// One POLLING step: query, interpret the index, decode, dispatch.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let key = self.key.as_str();
        let request = self.config.kv_request(key, self.cursor.index());

        let response = match self.store.blocking_read(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(key = %key, index = request.index, error = %e, "Failed to query key");
                return PollOutcome::Retry(RetryReason::Store);
            }
        };

        let candidate = match response.change_index() {
            ChangeIndex::Absent => None,
            ChangeIndex::Valid(index) => Some(index),
            ChangeIndex::Malformed(raw) => {
                tracing::error!(key = %key, header = %raw, "Failed to parse X-Consul-Index");
                return PollOutcome::Retry(RetryReason::MalformedIndex);
            }
        };

        let index = match self.cursor.advance(candidate) {
            Advance::Accepted(index) => index,
            Advance::Reset => {
                tracing::warn!(
                    key = %key,
                    returned = ?candidate,
                    "Index went backwards or to zero, resetting cursor"
                );
                return PollOutcome::Reset;
            }
        };

        let entries = match decode_entries(&response.body) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(key = %key, index, error = %e, "Failed to decode response body");
                return PollOutcome::Retry(RetryReason::MalformedBody);
            }
        };

        // Non-recursive lookup: at most one entry.
        let Some(entry) = entries.into_iter().next() else {
            tracing::warn!(key = %key, index, "Empty response, key does not exist");
            return PollOutcome::KeyMissing;
        };

        let value = match entry.decode_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key = %key, value = ?entry.value, error = %e, "Failed to decode value");
                return PollOutcome::Retry(RetryReason::MalformedValue);
            }
        };

        let table = DispatchTable::for_service(&self.config.service_name());
        let Some(action) = table.action_for(key) else {
            tracing::info!(key = %key, index, value = %value, "Key changed, no update rule");
            return PollOutcome::Ignored(value);
        };

        match action.decode(&value) {
            Ok(update) => {
                update.apply(&self.config);
                tracing::info!(key = %key, index, value = %value, "Updated");
                PollOutcome::Applied(update)
            }
            Err(e) => {
                tracing::error!(key = %key, index, error = %e, "Rejected value");
                PollOutcome::Retry(RetryReason::InvalidPayload)
            }
        }
    }
}
