//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! TTL heartbeat (ttl.rs):
//!     Periodic timer
//!     → SharedConfig::heartbeat_target (read lock)
//!     → CheckEndpoint::pass_check (bounded by ttl_timeout)
//! ```
//!
//! # Design Decisions
//! - The store marks the check failing when passes stop; nothing here reports failure
//! - A disabled check skips the tick, the timer keeps running
//! - One pass per tick whatever the previous tick did

pub mod ttl;

pub use ttl::{TickOutcome, TtlHeartbeat};
