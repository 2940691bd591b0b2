//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace, timeout)
//!     → handlers read SharedConfig (read lock) or toggle checks (write lock)
//!     → greeting.rs (language → text)
//! ```

pub mod greeting;
pub mod server;

pub use greeting::Greeting;
pub use server::{build_router, AppState, HttpServer};
