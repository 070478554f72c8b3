/*!
 * Tests for application configuration
 */

use log::LevelFilter;
use sly_lyrics::app_config::{Config, LogLevel};

use crate::common;

#[test]
fn test_default_config_should_be_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.target_language, "en");
    assert_eq!(config.services.google.max_chars_per_request, 500);
    assert_eq!(config.services.mymemory.max_chars_per_request, 450);
    assert!(config.pipeline.cache_enabled);
    assert!(config.romanization.remote_enabled);
}

#[test]
fn test_validate_with_invalid_language_should_fail() {
    let config = Config {
        target_language: "invalid".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_with_zero_ceiling_should_fail() {
    let mut config = Config::default();
    config.services.mymemory.max_chars_per_request = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_with_bad_endpoint_should_fail() {
    let mut config = Config::default();
    config.services.google.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    // A disabled service is not checked
    let mut config = Config::default();
    config.services.aksharamukha.enabled = false;
    config.services.aksharamukha.endpoint = "not a url".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_should_fill_defaults() {
    let config: Config = serde_json::from_str(
        r#"{"target_language": "fr", "pipeline": {"chunk_delay_ms": 50}, "log_level": "debug"}"#,
    )
    .unwrap();

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.pipeline.chunk_delay_ms, 50);
    assert!(config.pipeline.cache_enabled);
    assert_eq!(config.services.google.endpoint, "https://translate.googleapis.com");
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_load_or_create_should_write_default_then_reload() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let mut modified = created.clone();
    modified.target_language = "ko".to_string();
    modified.save(&path).unwrap();

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.target_language, "ko");
}

#[test]
fn test_load_or_create_with_malformed_file_should_fail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_log_level_to_level_filter() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::default().to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
