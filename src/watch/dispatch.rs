//! Key → configuration update mapping.
//!
//! # Responsibilities
//! - Map a watched key to the field it drives
//! - Decode a raw value into a typed update
//! - Apply the update to `SharedConfig`
//!
//! # Design Decisions
//! - The table is plain data, rebuilt from the current service name
//! - Keys without a rule are accepted and ignored
//! - Booleans follow the usual `1/t/T/TRUE/true/True` and `0/f/F/FALSE/false/False` spellings

use thiserror::Error;

use crate::config::SharedConfig;
use crate::observability::metrics;

/// Key that drives the greeting language.
pub const LANGUAGE_KEY: &str = "language";

/// Suffix (after the service name) of the key that toggles health checks.
pub const ENABLE_CHECKS_SUFFIX: &str = "enable_checks";

/// Which field a watched key drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SetLanguage,
    SetChecksEnabled,
}

/// A decoded, typed configuration change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    Language(String),
    ChecksEnabled(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("failed to parse enable_checks bool '{0}'")]
    InvalidBool(String),
}

/// Fixed mapping from key to action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    routes: Vec<(String, KeyAction)>,
}

impl DispatchTable {
    /// Build the table for a service. The checks key is `<service_name>enable_checks`.
    pub fn for_service(service_name: &str) -> Self {
        Self {
            routes: vec![
                (LANGUAGE_KEY.to_string(), KeyAction::SetLanguage),
                (
                    format!("{}{}", service_name, ENABLE_CHECKS_SUFFIX),
                    KeyAction::SetChecksEnabled,
                ),
            ],
        }
    }

    /// First matching rule for `key`.
    pub fn action_for(&self, key: &str) -> Option<KeyAction> {
        self.routes
            .iter()
            .find(|(route, _)| route == key)
            .map(|(_, action)| *action)
    }
}

impl KeyAction {
    pub fn decode(self, value: &str) -> Result<ConfigUpdate, DispatchError> {
        match self {
            KeyAction::SetLanguage => Ok(ConfigUpdate::Language(value.to_string())),
            KeyAction::SetChecksEnabled => parse_bool(value)
                .map(ConfigUpdate::ChecksEnabled)
                .ok_or_else(|| DispatchError::InvalidBool(value.to_string())),
        }
    }
}

impl ConfigUpdate {
    /// Name of the field this update writes.
    pub fn field(&self) -> &'static str {
        match self {
            ConfigUpdate::Language(_) => "language",
            ConfigUpdate::ChecksEnabled(_) => "enable_checks",
        }
    }

    /// Write the update. Takes the config lock for this one field only.
    pub fn apply(&self, config: &SharedConfig) {
        match self {
            ConfigUpdate::Language(language) => config.set_language(language.clone()),
            ConfigUpdate::ChecksEnabled(enabled) => config.set_checks_enabled(*enabled),
        }
        metrics::record_config_update(self.field());
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_table_routes() {
        let table = DispatchTable::for_service("hello-ttl/");

        assert_eq!(table.action_for("language"), Some(KeyAction::SetLanguage));
        assert_eq!(
            table.action_for("hello-ttl/enable_checks"),
            Some(KeyAction::SetChecksEnabled)
        );
        assert_eq!(table.action_for("enable_checks"), None);
        assert_eq!(table.action_for("hello-ttl/other"), None);
    }

    #[test]
    fn test_bool_variants() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{}", raw);
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{}", raw);
        }
        for raw in ["", "yes", "tRUE", " true", "2"] {
            assert_eq!(parse_bool(raw), None, "{:?}", raw);
        }
    }

    #[test]
    fn test_decode_checks_enabled() {
        assert_eq!(
            KeyAction::SetChecksEnabled.decode("false"),
            Ok(ConfigUpdate::ChecksEnabled(false))
        );
        assert_eq!(
            KeyAction::SetChecksEnabled.decode("maybe"),
            Err(DispatchError::InvalidBool("maybe".into()))
        );
    }

    #[test]
    fn test_language_accepts_anything() {
        assert_eq!(
            KeyAction::SetLanguage.decode("klingon"),
            Ok(ConfigUpdate::Language("klingon".into()))
        );
    }

    #[test]
    fn test_apply_writes_one_field() {
        let config = SharedConfig::new(Settings::default());

        ConfigUpdate::Language("french".into()).apply(&config);
        ConfigUpdate::ChecksEnabled(false).apply(&config);

        let snapshot = config.snapshot();
        assert_eq!(snapshot.language, "french");
        assert!(!snapshot.enable_checks);
        assert_eq!(snapshot.ttl_id, Settings::default().ttl_id);
    }
}
