//! Hello service: Consul key/value watcher and TTL heartbeat sidecar.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;
pub mod watch;

pub use config::{Settings, SharedConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
