//! Watch & Apply engine.
//!
//! # Data Flow
//! ```text
//! per watched key (one task each):
//!     RateLimiter::acquire
//!     → KvStore::blocking_read(key, cursor.index)
//!     → cursor.rs (accept or reset on the returned index)
//!     → decode entries + base64 value
//!     → dispatch.rs (key → ConfigUpdate)
//!     → SharedConfig (single-field write)
//! ```
//!
//! # Design Decisions
//! - Each watcher owns its cursor and limiter; nothing is shared but the config
//! - A reset discards the response instead of re-querying immediately
//! - Every failure is logged and retried; the loop only ends on cancellation
//! - The config lock is never held across the network call

pub mod cursor;
pub mod dispatch;
pub mod watcher;

pub use cursor::{Advance, WatchCursor};
pub use dispatch::{ConfigUpdate, DispatchError, DispatchTable, KeyAction};
pub use watcher::{BlockingWatcher, PollOutcome, RetryReason};
