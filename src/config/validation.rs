//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (durations > 0, rate > 0, burst >= 1)
//! - Check that the Consul address is an absolute URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Only explicitly set fields are checked; defaults are known good
//! - Validation is pure function: ConfigFile → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ConfigFile;

/// A single semantic problem in a configuration record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("watch_rate must be a positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("watch_burst must be at least 1")]
    ZeroBurst,

    #[error("consul_addr '{addr}' is not a valid URL: {reason}")]
    InvalidAddress { addr: String, reason: String },
}

/// Validate the explicitly set fields of a configuration record.
pub fn validate_config(config: &ConfigFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let durations = [
        ("ttl_interval", config.ttl_interval),
        ("ttl_timeout", config.ttl_timeout),
        ("watch_wait", config.watch_wait),
    ];
    for (field, value) in durations {
        if value.is_some_and(|d| d.is_zero()) {
            errors.push(ValidationError::ZeroDuration { field });
        }
    }

    if let Some(rate) = config.watch_rate {
        if !rate.is_finite() || rate <= 0.0 {
            errors.push(ValidationError::InvalidRate(rate));
        }
    }

    if config.watch_burst == Some(0) {
        errors.push(ValidationError::ZeroBurst);
    }

    if let Some(addr) = &config.consul_addr {
        if let Err(e) = Url::parse(addr) {
            errors.push(ValidationError::InvalidAddress {
                addr: addr.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
