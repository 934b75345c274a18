//! Configuration management for sumoq
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration file (TOML format, `~/.sumoq/config.toml` by default)
//! - Access-key document and environment variables (see [`credentials`])
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

pub mod credentials;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::AppFieldMap;
use crate::error::{ConfigError, Result, SumoqError};

pub use credentials::Credentials;

/// Main configuration structure
///
/// Plain keys come before the tables so the document serializes back to
/// valid TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fallback index names used when the metadata API is not reachable
    #[serde(default)]
    pub indexes: Vec<String>,

    /// Fallback custom field names
    #[serde(default)]
    pub fields: Vec<String>,

    /// Fallback namespace names
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// JSON document holding the where-value suggestions; wins over `[app_json]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_json_file: Option<PathBuf>,

    /// Metadata API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential lookup configuration
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Namespace listing configuration
    #[serde(default)]
    pub kubernetes: KubernetesConfig,

    /// Persisted candidate cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Query history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Prompt and display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Inline where-value suggestions: field name -> values
    #[serde(default)]
    pub app_json: AppFieldMap,
}

/// Metadata API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without the version segment
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// `limit` sent with every paginated request
    #[serde(default = "default_api_page_size")]
    pub page_size: u32,
}

/// Where to find the access keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// TOML document with `access_id` and `access_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_file: Option<PathBuf>,
}

/// Namespace listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesConfig {
    /// kubeconfig handed to the namespace lister; the lister is skipped without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Executable used to list namespaces
    #[serde(default = "default_kube_command")]
    pub command: String,
}

/// Persisted candidate cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path to the cache document
    #[serde(default = "default_cache_file")]
    pub file_path: PathBuf,

    /// Store producer results in the cache document
    #[serde(default = "default_persist_cache")]
    pub persist: bool,
}

/// Query history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Left prompt text
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Enable syntax highlighting
    #[serde(default = "default_syntax_highlighting")]
    pub syntax_highlighting: bool,

    /// Show producer status in the right prompt
    #[serde(default = "default_show_status")]
    pub show_status: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn sumoq_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sumoq")
}

// Default value functions
fn default_endpoint() -> String {
    "https://api.sumologic.com/api".to_string()
}

fn default_api_page_size() -> u32 {
    1000
}

fn default_kube_command() -> String {
    "kubectl".to_string()
}

fn default_cache_file() -> PathBuf {
    sumoq_dir().join("cache.json")
}

fn default_persist_cache() -> bool {
    true
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sumoq_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_prompt() -> String {
    "Query: ".to_string()
}

fn default_syntax_highlighting() -> bool {
    true
}

fn default_show_status() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            page_size: default_api_page_size(),
        }
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            command: default_kube_command(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file_path: default_cache_file(),
            persist: default_persist_cache(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            syntax_highlighting: default_syntax_highlighting(),
            show_status: default_show_status(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document
    ///
    /// # Arguments
    /// * `content` - TOML text
    ///
    /// # Returns
    /// * `Result<Config>` - Parsed configuration or error
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| SumoqError::Config(ConfigError::InvalidFormat(e.to_string())))?;
        config.expand_paths();
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// A missing default file yields the defaults; a missing file that was
    /// asked for explicitly is an error.
    ///
    /// # Arguments
    /// * `path` - Explicit configuration path, or `None` for the default location
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let explicit = path.is_some();
        let path = path
            .map(expand_home)
            .unwrap_or_else(Self::default_config_path);

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_config_path() -> PathBuf {
        sumoq_dir().join("config.toml")
    }

    /// Serialize the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SumoqError::Config(ConfigError::Generic(e.to_string())))
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.api.endpoint.as_str();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(invalid("api.endpoint", endpoint));
        }
        if self.api.page_size == 0 {
            return Err(invalid("api.page_size", "0"));
        }
        if self.kubernetes.command.trim().is_empty() {
            return Err(invalid("kubernetes.command", &self.kubernetes.command));
        }
        if self.history.max_size == 0 {
            return Err(invalid("history.max_size", "0"));
        }
        Ok(())
    }

    fn expand_paths(&mut self) {
        let expand = |p: &mut PathBuf| *p = expand_home(p);

        expand(&mut self.cache.file_path);
        expand(&mut self.history.file_path);
        self.app_json_file.iter_mut().for_each(expand);
        self.credentials.keys_file.iter_mut().for_each(expand);
        self.kubernetes.kubeconfig.iter_mut().for_each(expand);
        self.logging.file_path.iter_mut().for_each(expand);
    }
}

fn invalid(field: &str, value: &str) -> SumoqError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
