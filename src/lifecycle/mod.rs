//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → SharedConfig → spawn watchers + heartbeat → bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → cancel every task token → stop HTTP server → join tasks
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger config reload
//! ```
//!
//! # Design Decisions
//! - Every task has its own token and a join handle
//! - In-flight polls are dropped on cancellation, not awaited

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{spawn_engine, Engine};
