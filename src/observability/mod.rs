//! Logging and metrics.
//!
//! ```text
//! watchers, heartbeat, HTTP server
//!     → logging.rs  (tracing events to stdout, level from debug_mode or RUST_LOG)
//!     → metrics.rs  (poll, update and heartbeat counters)
//!         → Prometheus scrape endpoint when --metrics-addr is set
//! ```
//!
//! Without an installed recorder the counters are no-ops, so tests need no setup.

pub mod logging;
pub mod metrics;
