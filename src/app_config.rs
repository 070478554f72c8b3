use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO 639-1, optional region such as `zh-CN`)
    pub target_language: String,

    /// Remote services
    #[serde(default)]
    pub services: ServicesConfig,

    /// Orchestration settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Romanization settings
    #[serde(default)]
    pub romanization: RomanizationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote service configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    /// Primary translator
    #[serde(default)]
    pub google: GoogleConfig,

    /// Secondary translator
    #[serde(default)]
    pub mymemory: MyMemoryConfig,

    /// Transliteration service
    #[serde(default)]
    pub aksharamukha: AksharamukhaConfig,
}

/// Google Translate configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    /// Service endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// Maximum request size in UTF-16 code units
    #[serde(default = "default_google_max_chars")]
    pub max_chars_per_request: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            max_chars_per_request: default_google_max_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// MyMemory configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MyMemoryConfig {
    /// Service endpoint URL
    #[serde(default = "default_mymemory_endpoint")]
    pub endpoint: String,

    /// Maximum request size in UTF-16 code units
    #[serde(default = "default_mymemory_max_chars")]
    pub max_chars_per_request: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Contact email, raises the anonymous daily quota
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for MyMemoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_mymemory_endpoint(),
            max_chars_per_request: default_mymemory_max_chars(),
            timeout_secs: default_timeout_secs(),
            email: None,
        }
    }
}

/// Aksharamukha configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AksharamukhaConfig {
    /// Service endpoint URL
    #[serde(default = "default_aksharamukha_endpoint")]
    pub endpoint: String,

    /// Whether the transliteration tiers are used
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AksharamukhaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_aksharamukha_endpoint(),
            enabled: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Orchestration settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Delay in milliseconds between consecutive chunk requests
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,

    /// Whether whole-song results are cached per target language
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Upper bound on one `process` call seen from the command line
    #[serde(default = "default_process_timeout_secs")]
    pub process_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_delay_ms: default_chunk_delay_ms(),
            cache_enabled: true,
            process_timeout_secs: default_process_timeout_secs(),
        }
    }
}

/// Romanization settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RomanizationConfig {
    /// Whether remote romanization tiers are used at all
    #[serde(default = "default_true")]
    pub remote_enabled: bool,

    /// Optional `surface<TAB>reading` dictionary for kanji readings
    #[serde(default)]
    pub japanese_dictionary: Option<PathBuf>,
}

impl Default for RomanizationConfig {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            japanese_dictionary: None,
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
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_mymemory_endpoint() -> String {
    "https://api.mymemory.translated.net".to_string()
}

fn default_aksharamukha_endpoint() -> String {
    "https://aksharamukha-plugin.appspot.com/api/public".to_string()
}

fn default_google_max_chars() -> usize {
    500
}

fn default_mymemory_max_chars() -> usize {
    450
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_chunk_delay_ms() -> u64 {
    120
}

fn default_process_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn check_endpoint(name: &str, endpoint: &str) -> Result<()> {
    Url::parse(endpoint)
        .map(|_| ())
        .map_err(|e| anyhow!("Invalid {} endpoint '{}': {}", name, endpoint, e))
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.target_language)?;

        if self.services.google.max_chars_per_request == 0 {
            return Err(anyhow!("services.google.max_chars_per_request must be greater than zero"));
        }
        if self.services.mymemory.max_chars_per_request == 0 {
            return Err(anyhow!("services.mymemory.max_chars_per_request must be greater than zero"));
        }

        check_endpoint("Google", &self.services.google.endpoint)?;
        check_endpoint("MyMemory", &self.services.mymemory.endpoint)?;
        if self.services.aksharamukha.enabled {
            check_endpoint("Aksharamukha", &self.services.aksharamukha.endpoint)?;
        }

        Ok(())
    }

    /// Load the configuration, writing a default file first when none exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: "en".to_string(),
            services: ServicesConfig::default(),
            pipeline: PipelineConfig::default(),
            romanization: RomanizationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
