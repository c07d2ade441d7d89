/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srtclip::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.silence_ms, 500);
    assert_eq!(config.index_width, 3);
    assert!(!config.pad_interactive_index);
    assert!(config.show_progress);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withOutOfRangeValues_shouldFail() {
    let mut config = Config::default();

    config.index_width = 0;
    assert!(config.validate().is_err());
    config.index_width = 10;
    assert!(config.validate().is_err());
    config.index_width = 3;

    config.silence_ms = 60_001;
    assert!(config.validate().is_err());
    config.silence_ms = 0;
    assert!(config.validate().is_ok());
}

/// Test that partial JSON falls back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{ "silence_ms": 250, "log_level": "debug" }"#)?;

    assert_eq!(config.silence_ms, 250);
    assert_eq!(config.index_width, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that a missing config file is created with defaults and then reloaded
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    std::fs::write(&path, r#"{ "index_width": 4, "pad_interactive_index": true }"#)?;
    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.index_width, 4);
    assert_eq!(loaded.extract_options().index_width, Some(4));
    assert_eq!(loaded.batch_options().silence_ms, 500);
    Ok(())
}
