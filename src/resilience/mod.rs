//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Watcher loop:
//!     → rate_limit.rs (wait for a poll token)
//!     → blocking query to the store
//! ```
//!
//! # Design Decisions
//! - One bucket per watcher, no cross-key sharing
//! - Buckets bound poll frequency even when the store fails instantly
//! - Waiting uses Tokio time so tests can run on a paused clock

pub mod rate_limit;

pub use rate_limit::{RateLimitError, RateLimiter};
