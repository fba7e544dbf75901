use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the settings the playback session reads: language
/// pair, translation toggle, voice parameters and clock cadence.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the cue track (BCP 47 style tag, e.g. "en")
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language to translate and speak in (e.g. "pt-BR")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Whether cues are translated and spoken
    #[serde(default)]
    pub translation_enabled: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Speech synthesis config
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Playback clock config
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google translate public endpoint
    #[default]
    Google,
    // @provider: Offline mock that tags text with the target language
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    // @field: Service URL, empty for the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslationConfig {
    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }
}

/// Speech engine type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechEngineKind {
    // @engine: Write utterances to the log
    #[default]
    Log,
    // @engine: Run a local synthesizer command
    Command,
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// Engine used to speak translations
    #[serde(default)]
    pub engine: SpeechEngineKind,

    /// Synthesizer program for the command engine
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Preferred voice name; the first voice for the target language otherwise
    #[serde(default)]
    pub voice: Option<String>,

    /// Speaking rate, 1.0 is normal speed (0.1 to 10.0)
    #[serde(default = "default_one")]
    pub rate: f32,

    /// Voice pitch, 1.0 is the voice default (0.0 to 2.0)
    #[serde(default = "default_one")]
    pub pitch: f32,

    /// Volume (0.0 to 1.0)
    #[serde(default = "default_one")]
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::default(),
            command: default_speech_command(),
            voice: None,
            rate: default_one(),
            pitch: default_one(),
            volume: default_one(),
        }
    }
}

/// Playback clock configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaybackConfig {
    /// Interval between clock ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Playback speed multiplier
    #[serde(default = "default_one")]
    pub speed: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            speed: default_one(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "pt-BR".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

fn default_one() -> f32 {
    1.0
}

fn default_tick_interval_ms() -> u64 {
    // Roughly the cadence of a browser media element's timeupdate event
    250
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        crate::language_utils::validate_language_tag(&self.source_language)
            .context("Invalid source language")?;
        crate::language_utils::validate_language_tag(&self.target_language)
            .context("Invalid target language")?;

        let speech = &self.speech;
        if !(0.1..=10.0).contains(&speech.rate) {
            return Err(anyhow!("Speech rate must be between 0.1 and 10.0, got {}", speech.rate));
        }
        if !(0.0..=2.0).contains(&speech.pitch) {
            return Err(anyhow!("Speech pitch must be between 0.0 and 2.0, got {}", speech.pitch));
        }
        if !(0.0..=1.0).contains(&speech.volume) {
            return Err(anyhow!("Speech volume must be between 0.0 and 1.0, got {}", speech.volume));
        }
        if speech.engine == SpeechEngineKind::Command && speech.command.trim().is_empty() {
            return Err(anyhow!("A synthesizer command is required for the command speech engine"));
        }

        if self.playback.tick_interval_ms == 0 {
            return Err(anyhow!("Tick interval must be greater than zero"));
        }
        if !(self.playback.speed > 0.0 && self.playback.speed.is_finite()) {
            return Err(anyhow!("Playback speed must be positive, got {}", self.playback.speed));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation_enabled: false,
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            playback: PlaybackConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
