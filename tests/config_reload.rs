//! Persisted configuration round trips and hot reload.

use std::fs;
use std::time::Duration;

use hello_service::config::{load_config, save_config, ConfigError, ConfigFile, Settings, SharedConfig};

fn partial_config() -> ConfigFile {
    ConfigFile {
        language: Some("spanish".into()),
        consul_addr: Some("http://10.0.0.5:8500".into()),
        ttl_interval: Some(Duration::from_secs(12)),
        enable_checks: Some(false),
        keys_to_watch: Some(vec!["language".into(), "hello-ttl/enable_checks".into()]),
        watch_rate: Some(0.5),
        ..Default::default()
    }
}

fn assert_round_trip(file_name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    let saved = partial_config();

    save_config(&path, &saved).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, saved);

    let settings = loaded.finalize();
    let defaults = Settings::default();
    assert_eq!(settings.language, "spanish");
    assert_eq!(settings.consul_addr, "http://10.0.0.5:8500");
    assert_eq!(settings.ttl_interval, Duration::from_secs(12));
    assert!(!settings.enable_checks);
    assert_eq!(settings.keys_to_watch.len(), 2);
    assert_eq!(settings.watch_rate, 0.5);
    // Unset fields come from the defaults
    assert_eq!(settings.kv_path, defaults.kv_path);
    assert_eq!(settings.ttl_id, defaults.ttl_id);
    assert_eq!(settings.watch_burst, defaults.watch_burst);
    assert_eq!(settings.debug_mode, defaults.debug_mode);
}

#[test]
fn test_json_round_trip() {
    assert_round_trip("config.json");
}

#[test]
fn test_toml_round_trip() {
    assert_round_trip("config.toml");
}

#[test]
fn test_unset_fields_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    save_config(&path, &ConfigFile {
        language: Some("french".into()),
        ..Default::default()
    })
    .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"language\""));
    assert!(!raw.contains("consul_addr"));
}

#[test]
fn test_reload_merges_over_current() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"enable_checks": false, "kv_path": "/v1/kv/other/"}"#).unwrap();

    let config = SharedConfig::new(Settings::default());
    config.set_language("french");
    config.reload_from_file(&path);

    let snapshot = config.snapshot();
    assert!(!snapshot.enable_checks);
    assert_eq!(snapshot.kv_path, "/v1/kv/other/");
    assert_eq!(snapshot.language, "french");
}

#[test]
fn test_broken_file_keeps_current_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));

    let config = SharedConfig::new(Settings::default());
    config.set_language("portuguese");
    config.reload_from_file(&path);
    assert_eq!(config.language(), "portuguese");
}
