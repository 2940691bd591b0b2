//! Configuration schema definitions.
//!
//! `ConfigFile` mirrors the on-disk record: every field is optional so a partial
//! file is valid. `Settings` is the resolved record the service runs on, produced
//! by [`ConfigFile::finalize`] with every gap filled from the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration record as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Greeting language (`english`, `french`, `portuguese`, `spanish`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Base address of the Consul agent (e.g., "http://localhost:8500").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consul_addr: Option<String>,

    /// Key/value path prefix the watched keys live under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kv_path: Option<String>,

    /// Service name, used as the prefix of service-scoped keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Agent endpoint that marks a TTL check as passing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_endpoint: Option<String>,

    /// TTL check identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_id: Option<String>,

    /// Heartbeat cadence (e.g., "5s").
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub ttl_interval: Option<Duration>,

    /// Whether the TTL heartbeat and `/healthz` report passing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_checks: Option<bool>,

    /// Verbose logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,

    /// Keys to watch, relative to `kv_path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys_to_watch: Option<Vec<String>>,

    /// Poll token refill rate, in tokens per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_rate: Option<f64>,

    /// Maximum number of poll tokens that can be banked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_burst: Option<u32>,

    /// Server-side wait requested on each blocking query.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub watch_wait: Option<Duration>,

    /// Deadline for a single heartbeat request.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub ttl_timeout: Option<Duration>,
}

impl ConfigFile {
    /// Field-by-field merge: values set on `self` win over `base`.
    pub fn merge(self, base: ConfigFile) -> ConfigFile {
        ConfigFile {
            language: self.language.or(base.language),
            consul_addr: self.consul_addr.or(base.consul_addr),
            kv_path: self.kv_path.or(base.kv_path),
            service_name: self.service_name.or(base.service_name),
            ttl_endpoint: self.ttl_endpoint.or(base.ttl_endpoint),
            ttl_id: self.ttl_id.or(base.ttl_id),
            ttl_interval: self.ttl_interval.or(base.ttl_interval),
            enable_checks: self.enable_checks.or(base.enable_checks),
            debug_mode: self.debug_mode.or(base.debug_mode),
            keys_to_watch: self.keys_to_watch.or(base.keys_to_watch),
            watch_rate: self.watch_rate.or(base.watch_rate),
            watch_burst: self.watch_burst.or(base.watch_burst),
            watch_wait: self.watch_wait.or(base.watch_wait),
            ttl_timeout: self.ttl_timeout.or(base.ttl_timeout),
        }
    }

    /// Resolve into [`Settings`], filling unset fields from the defaults.
    pub fn finalize(self) -> Settings {
        let ConfigFile {
            language,
            consul_addr,
            kv_path,
            service_name,
            ttl_endpoint,
            ttl_id,
            ttl_interval,
            enable_checks,
            debug_mode,
            keys_to_watch,
            watch_rate,
            watch_burst,
            watch_wait,
            ttl_timeout,
        } = self;

        let defaults = Settings::default();
        Settings {
            language: language.unwrap_or(defaults.language),
            consul_addr: consul_addr.unwrap_or(defaults.consul_addr),
            kv_path: kv_path.unwrap_or(defaults.kv_path),
            service_name: service_name.unwrap_or(defaults.service_name),
            ttl_endpoint: ttl_endpoint.unwrap_or(defaults.ttl_endpoint),
            ttl_id: ttl_id.unwrap_or(defaults.ttl_id),
            ttl_interval: ttl_interval.unwrap_or(defaults.ttl_interval),
            enable_checks: enable_checks.unwrap_or(defaults.enable_checks),
            debug_mode: debug_mode.unwrap_or(defaults.debug_mode),
            keys_to_watch: keys_to_watch.unwrap_or(defaults.keys_to_watch),
            watch_rate: watch_rate.unwrap_or(defaults.watch_rate),
            watch_burst: watch_burst.unwrap_or(defaults.watch_burst),
            watch_wait: watch_wait.unwrap_or(defaults.watch_wait),
            ttl_timeout: ttl_timeout.unwrap_or(defaults.ttl_timeout),
        }
    }
}

/// Fully resolved settings. Every field always has a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub language: String,
    pub consul_addr: String,
    pub kv_path: String,
    pub service_name: String,
    pub ttl_endpoint: String,
    pub ttl_id: String,
    pub ttl_interval: Duration,
    pub enable_checks: bool,
    pub debug_mode: bool,
    pub keys_to_watch: Vec<String>,
    pub watch_rate: f64,
    pub watch_burst: u32,
    pub watch_wait: Duration,
    pub ttl_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "english".to_string(),
            consul_addr: "http://localhost:8500".to_string(),
            kv_path: "/v1/kv/service/hello/".to_string(),
            service_name: "hello-ttl/".to_string(),
            ttl_endpoint: "/v1/agent/check/pass/".to_string(),
            ttl_id: "hello_ttl".to_string(),
            ttl_interval: Duration::from_secs(5),
            enable_checks: true,
            debug_mode: false,
            keys_to_watch: vec!["hello-ttl/enable_checks".to_string()],
            // One poll every ten seconds, two banked.
            watch_rate: 0.1,
            watch_burst: 2,
            watch_wait: Duration::from_secs(300),
            ttl_timeout: Duration::from_secs(5),
        }
    }
}

impl From<Settings> for ConfigFile {
    fn from(settings: Settings) -> Self {
        ConfigFile {
            language: Some(settings.language),
            consul_addr: Some(settings.consul_addr),
            kv_path: Some(settings.kv_path),
            service_name: Some(settings.service_name),
            ttl_endpoint: Some(settings.ttl_endpoint),
            ttl_id: Some(settings.ttl_id),
            ttl_interval: Some(settings.ttl_interval),
            enable_checks: Some(settings.enable_checks),
            debug_mode: Some(settings.debug_mode),
            keys_to_watch: Some(settings.keys_to_watch),
            watch_rate: Some(settings.watch_rate),
            watch_burst: Some(settings.watch_burst),
            watch_wait: Some(settings.watch_wait),
            ttl_timeout: Some(settings.ttl_timeout),
        }
    }
}
