//! External store collaborators.
//!
//! # Data Flow
//! ```text
//! BlockingWatcher
//!     → KvStore::blocking_read (long poll, returns index header + body)
//!     → types.rs (ChangeIndex, KvEntry decoding)
//!
//! TtlHeartbeat
//!     → CheckEndpoint::pass_check (PUT, returns status)
//! ```
//!
//! # Design Decisions
//! - The engine only sees the two traits; consul.rs is the HTTP implementation
//! - A missing key is not an error: the store answers with an empty body
//! - Non-2xx statuses other than 404 surface as `StoreError::Status`

pub mod consul;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use consul::ConsulClient;
pub use types::{
    decode_entries, BlockingRead, ChangeIndex, CheckRequest, KvEntry, KvRequest, CONSUL_INDEX_HEADER,
};

/// Errors returned by store calls. All of them are transient to the engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store URL {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Key/value side of the store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Issue a blocking query. May not return until the key changes or the
    /// request's wait elapses.
    async fn blocking_read(&self, request: &KvRequest) -> Result<BlockingRead, StoreError>;
}

/// Health-check side of the store.
#[async_trait]
pub trait CheckEndpoint: Send + Sync {
    /// Mark a TTL check as passing. Returns the HTTP status code.
    async fn pass_check(&self, request: &CheckRequest) -> Result<u16, StoreError>;
}
