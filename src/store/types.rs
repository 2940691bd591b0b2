//! Wire types for the Consul HTTP API.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::store::StoreError;

/// Response header carrying the store's change index.
pub const CONSUL_INDEX_HEADER: &str = "X-Consul-Index";

/// A single blocking read of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvRequest {
    pub address: String,
    pub kv_path: String,
    pub key: String,
    /// Index to block on; the store answers once its index moves past it.
    pub index: u64,
    /// Server-side wait before the store answers with no change.
    pub wait: Duration,
}

impl KvRequest {
    pub fn url(&self) -> Result<Url, StoreError> {
        let raw = format!("{}{}{}", self.address, self.kv_path, self.key);
        let mut url = Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut()
            .append_pair("index", &self.index.to_string())
            .append_pair("wait", &format!("{}s", self.wait.as_secs().max(1)));
        Ok(url)
    }
}

/// A "mark passing" call for a TTL check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub address: String,
    pub endpoint: String,
    pub check_id: String,
}

impl CheckRequest {
    pub fn url(&self) -> Result<Url, StoreError> {
        let raw = format!("{}{}{}", self.address, self.endpoint, self.check_id);
        Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

/// Raw outcome of a blocking read: the index header and the undecoded body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingRead {
    /// Value of the `X-Consul-Index` header, if the store sent one.
    pub index: Option<String>,
    /// JSON body. Empty when the key does not exist.
    pub body: String,
}

impl BlockingRead {
    pub fn change_index(&self) -> ChangeIndex {
        ChangeIndex::parse(self.index.as_deref())
    }
}

/// Interpretation of the change-index header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeIndex {
    Absent,
    Malformed(String),
    Valid(u64),
}

impl ChangeIndex {
    pub fn parse(header: Option<&str>) -> Self {
        match header {
            None | Some("") => ChangeIndex::Absent,
            Some(raw) => raw
                .parse::<u64>()
                .map(ChangeIndex::Valid)
                .unwrap_or_else(|_| ChangeIndex::Malformed(raw.to_string())),
        }
    }
}

/// One key/value entry as returned by `GET /v1/kv/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvEntry {
    #[serde(default)]
    pub lock_index: u64,
    pub key: String,
    #[serde(default)]
    pub flags: u64,
    /// Base64-encoded value; `null` for keys stored without one.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub create_index: u64,
    #[serde(default)]
    pub modify_index: u64,
}

impl KvEntry {
    /// Decode the base64 value. A key stored without a value decodes to "".
    pub fn decode_value(&self) -> Result<String, base64::DecodeError> {
        let Some(encoded) = &self.value else {
            return Ok(String::new());
        };
        let bytes = BASE64.decode(encoded)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Decode a blocking-read body. An empty body means no entries.
pub fn decode_entries(body: &str) -> Result<Vec<KvEntry>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body)
}
