/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use cuedub::app_config::{Config, LogLevel, SpeechEngineKind, TranslationProvider};
use log::LevelFilter;
use std::str::FromStr;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt-BR");
    assert!(!config.translation_enabled);
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.timeout_secs, 10);
    assert_eq!(config.speech.engine, SpeechEngineKind::Log);
    assert_eq!(config.speech.voice, None);
    assert_eq!(config.speech.rate, 1.0);
    assert_eq!(config.speech.pitch, 1.0);
    assert_eq!(config.speech.volume, 1.0);
    assert_eq!(config.playback.tick_interval_ms, 250);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "es-419".to_string();
    assert!(config.validate().is_ok());

    config.speech.rate = 0.05;
    assert!(config.validate().is_err());
    config.speech.rate = 10.0;
    assert!(config.validate().is_ok());

    config.speech.pitch = 2.5;
    assert!(config.validate().is_err());
    config.speech.pitch = 0.0;

    config.speech.volume = 1.5;
    assert!(config.validate().is_err());
    config.speech.volume = 0.0;
    assert!(config.validate().is_ok());

    config.speech.engine = SpeechEngineKind::Command;
    config.speech.command = "  ".to_string();
    assert!(config.validate().is_err());
    config.speech.command = "espeak-ng".to_string();

    config.playback.tick_interval_ms = 0;
    assert!(config.validate().is_err());
    config.playback.tick_interval_ms = 100;

    config.playback.speed = 0.0;
    assert!(config.validate().is_err());
    config.playback.speed = f32::NAN;
    assert!(config.validate().is_err());
    config.playback.speed = 1.5;
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "target_language": "es",
            "translation_enabled": true,
            "translation": { "provider": "mock" },
            "speech": { "engine": "command", "voice": "Spanish", "rate": 1.25 },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "es");
    assert!(config.translation_enabled);
    assert_eq!(config.translation.provider, TranslationProvider::Mock);
    assert_eq!(config.speech.engine, SpeechEngineKind::Command);
    assert_eq!(config.speech.command, "espeak-ng");
    assert_eq!(config.speech.voice.as_deref(), Some("Spanish"));
    assert_eq!(config.speech.rate, 1.25);
    assert_eq!(config.speech.volume, 1.0);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_from_file_withMissingOrInvalidFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());

    let path = common::create_test_file(temp_dir.path(), "bad.json", "{ not json")?;
    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_config_roundTrip_throughJson_shouldKeepValues() -> Result<()> {
    let mut config = Config::default();
    config.speech.voice = Some("pt-br".to_string());
    config.playback.speed = 2.0;

    let json = serde_json::to_string(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;
    assert_eq!(parsed.speech.voice, config.speech.voice);
    assert_eq!(parsed.playback.speed, 2.0);
    Ok(())
}

#[test]
fn test_translation_provider_fromStr_shouldParseKnownNames() {
    assert_eq!(TranslationProvider::from_str("Google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str("mock").unwrap(), TranslationProvider::Mock);
    assert!(TranslationProvider::from_str("ollama").is_err());
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::Mock.display_name(), "Mock");
}

#[test]
fn test_get_endpoint_withoutOverride_shouldUseProviderDefault() {
    let mut config = Config::default();
    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");

    config.translation.endpoint = "http://localhost:9000".to_string();
    assert_eq!(config.translation.get_endpoint(), "http://localhost:9000");
}

#[test]
fn test_log_level_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
