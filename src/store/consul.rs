//! Consul HTTP API client.
//!
//! # Responsibilities
//! - Blocking KV reads with `?index=&wait=` and the `X-Consul-Index` header
//! - TTL check pass calls (`PUT /v1/agent/check/pass/<id>`)
//! - Per-request timeouts sized to the blocking wait

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

use crate::store::types::{BlockingRead, CheckRequest, KvRequest, CONSUL_INDEX_HEADER};
use crate::store::{CheckEndpoint, KvStore, StoreError};

/// Slack on top of the blocking wait before the client gives up on a read.
const READ_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Consul agent client shared by all watchers and the heartbeat.
#[derive(Debug, Clone)]
pub struct ConsulClient {
    http: reqwest::Client,
}

impl ConsulClient {
    /// Create a new client.
    pub fn new() -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hello-service/", env!("CARGO_PKG_VERSION")))
            // Talks to the local agent directly
            .no_proxy()
            .build()?;
        Ok(Self { http })
    }

    /// Consul adds up to wait/16 of jitter to a blocking query.
    fn read_timeout(wait: Duration) -> Duration {
        wait + wait / 16 + READ_TIMEOUT_SLACK
    }
}

#[async_trait]
impl KvStore for ConsulClient {
    async fn blocking_read(&self, request: &KvRequest) -> Result<BlockingRead, StoreError> {
        let url = request.url()?;
        tracing::debug!(url = %url, "Issuing blocking query");

        let response = self
            .http
            .get(url)
            .timeout(Self::read_timeout(request.wait))
            .send()
            .await?;

        let status = response.status();
        let index = response
            .headers()
            .get(CONSUL_INDEX_HEADER)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        // Consul answers 404 for a key that does not exist yet, still with an index.
        if status == StatusCode::NOT_FOUND {
            return Ok(BlockingRead {
                index,
                body: String::new(),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(BlockingRead { index, body })
    }
}

#[async_trait]
impl CheckEndpoint for ConsulClient {
    async fn pass_check(&self, request: &CheckRequest) -> Result<u16, StoreError> {
        let url = request.url()?;
        let response = self.http.put(url).send().await?;
        Ok(response.status().as_u16())
    }
}
