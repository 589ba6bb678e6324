//! TOML Configuration File Support
//!
//! Centralized configuration loading for the companion, backed by an optional
//! TOML file at `~/.config/wellness-companion/companion.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [assistant]
//! model = "gemini-1.5-flash"
//! api_base_url = "https://generativelanguage.googleapis.com/v1beta"
//! request_timeout_secs = 30
//!
//! [history]
//! file = "/home/me/.local/share/wellness-companion/mood_history.json"
//! recent_limit = 50
//!
//! [session]
//! max_chat_turns = 200
//! max_message_size = 4096
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};
use crate::history::{HistoryLog, DEFAULT_RECENT_LIMIT};
use crate::resolver::ReplyResolver;
use crate::security::CompanionLimits;

/// Default transcript cap
pub const DEFAULT_MAX_CHAT_TURNS: usize = 200;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where configuration values came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Assistant section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantToml {
    /// API key (prefer the environment for secrets)
    pub api_key: Option<String>,

    /// Model name
    pub model: Option<String>,

    /// Base URL of the generation API
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

/// History section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryToml {
    /// Path of the history log
    pub file: Option<PathBuf>,

    /// Entries shown in history views
    pub recent_limit: Option<usize>,
}

/// Session section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionToml {
    /// Chat turns kept in memory (0 = unlimited)
    pub max_chat_turns: Option<usize>,

    /// Maximum chat message size in bytes
    pub max_message_size: Option<usize>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionToml {
    /// Assistant configuration section
    pub assistant: AssistantToml,

    /// History configuration section
    pub history: HistoryToml,

    /// Session configuration section
    pub session: SessionToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved companion configuration
///
/// Use [`load_config`] to build one from every source.
#[derive(Clone, Debug)]
pub struct CompanionConfig {
    /// API key for the generation service
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Base URL of the generation API
    pub api_base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Path of the history log
    pub history_file: PathBuf,

    /// Entries shown in history views
    pub recent_limit: usize,

    /// Chat turns kept in memory (0 = unlimited)
    pub max_chat_turns: usize,

    /// Input size limits
    pub limits: CompanionLimits,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            history_file: HistoryLog::default_path(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            max_chat_turns: DEFAULT_MAX_CHAT_TURNS,
            limits: CompanionLimits::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CompanionConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Backend settings derived from this configuration
    #[must_use]
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            request_timeout: self.request_timeout,
        }
    }

    /// Reply resolver for the configured model and timeout
    #[must_use]
    pub fn resolver(&self) -> ReplyResolver {
        ReplyResolver::new(&self.model, self.request_timeout)
    }

    /// History log at the configured path
    #[must_use]
    pub fn history_log(&self) -> HistoryLog {
        HistoryLog::new(&self.history_file)
    }

    /// Check values that would make the companion unusable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero timeout, a zero
    /// history limit, an empty model name or a zero message size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.recent_limit == 0 {
            return Err(ConfigError::ValidationError(
                "history recent_limit must be greater than zero".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model name must not be empty".to_string(),
            ));
        }
        if self.limits.max_message_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/wellness-companion/companion.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wellness-companion").join("companion.toml"))
}

/// Load configuration from all sources with proper priority
///
/// The file location is taken from `COMPANION_CONFIG` when set, otherwise
/// [`default_config_path`].
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if the merged values fail validation. A missing config file is not an
/// error.
pub fn load_config() -> Result<CompanionConfig, ConfigError> {
    let path = std::env::var_os("COMPANION_CONFIG")
        .map(PathBuf::from)
        .or_else(default_config_path);
    load_config_from_path(path)
}

/// Load configuration from a specific path, then apply the environment
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CompanionConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<CompanionConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = CompanionConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CompanionToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CompanionConfig, toml: &CompanionToml) {
    if let Some(ref key) = toml.assistant.api_key {
        if !key.trim().is_empty() {
            config.api_key = Some(key.trim().to_string());
        }
    }
    if let Some(ref model) = toml.assistant.model {
        config.model = model.clone();
    }
    if let Some(ref url) = toml.assistant.api_base_url {
        config.api_base_url = url.clone();
    }
    if let Some(secs) = toml.assistant.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    if let Some(ref file) = toml.history.file {
        config.history_file = file.clone();
    }
    if let Some(limit) = toml.history.recent_limit {
        config.recent_limit = limit;
    }

    if let Some(turns) = toml.session.max_chat_turns {
        config.max_chat_turns = turns;
    }
    if let Some(size) = toml.session.max_message_size {
        config.limits.max_message_size = size;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut CompanionConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_blank("GEMINI_API_KEY").or_else(|| non_blank("GOOGLE_API_KEY")) {
        config.api_key = Some(key.trim().to_string());
        config.source = ConfigSource::Env;
    }
    if let Some(model) = non_blank("COMPANION_MODEL") {
        config.model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(url) = non_blank("COMPANION_API_BASE_URL") {
        config.api_base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("COMPANION_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.trim().parse::<u64>() {
            config.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(file) = non_blank("COMPANION_HISTORY_FILE") {
        config.history_file = PathBuf::from(file);
        config.source = ConfigSource::Env;
    }
    if let Some(limit) = env("COMPANION_HISTORY_LIMIT") {
        if let Ok(n) = limit.trim().parse::<usize>() {
            config.recent_limit = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(turns) = env("COMPANION_MAX_CHAT_TURNS") {
        if let Ok(n) = turns.trim().parse::<usize>() {
            config.max_chat_turns = n;
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = CompanionConfig::default();

        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.recent_limit, 50);
        assert_eq!(config.max_chat_turns, 200);
        assert!(config.history_file.ends_with("mood_history.json"));
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("wellness-companion/companion.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[assistant]
model = "gemini-test"
api_base_url = "http://localhost:9999/v1"
request_timeout_secs = 5

[history]
file = "/tmp/companion/history.json"
recent_limit = 10

[session]
max_chat_turns = 20
max_message_size = 512
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.api_base_url, "http://localhost:9999/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.history_file, PathBuf::from("/tmp/companion/history.json"));
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.max_chat_turns, 20);
        assert_eq!(config.limits.max_message_size, 512);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = toml_file("[assistant]\nmodel = \"only-model\"\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.model, "only-model");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.recent_limit, DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/wellness-companion/companion.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[assistant\nmodel = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[assistant]\nmodel = \"file-model\"\nrequest_timeout_secs = 5\n");
        let env = env_from(&[
            ("COMPANION_MODEL", "env-model"),
            ("COMPANION_REQUEST_TIMEOUT", "12"),
            ("COMPANION_HISTORY_LIMIT", "7"),
            ("COMPANION_MAX_CHAT_TURNS", "0"),
            ("COMPANION_HISTORY_FILE", "/tmp/env-history.json"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.model, "env-model");
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.recent_limit, 7);
        assert_eq!(config.max_chat_turns, 0);
        assert_eq!(config.history_file, PathBuf::from("/tmp/env-history.json"));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_api_key_precedence() {
        let both = env_from(&[("GEMINI_API_KEY", "gemini"), ("GOOGLE_API_KEY", "google")]);
        let config = load_config_with_env(None, both).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gemini"));

        let blank_primary = env_from(&[("GEMINI_API_KEY", "  "), ("GOOGLE_API_KEY", "google")]);
        let config = load_config_with_env(None, blank_primary).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("google"));

        let config = load_config_with_env(None, no_env).unwrap();
        assert!(config.backend_config().api_key.is_none());
    }

    #[test]
    fn test_unparseable_env_number_ignored() {
        let env = env_from(&[("COMPANION_REQUEST_TIMEOUT", "soon")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let env = env_from(&[("COMPANION_REQUEST_TIMEOUT", "0")]);
        let result = load_config_with_env(None, env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_recent_limit_rejected() {
        let file = toml_file("[history]\nrecent_limit = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_derived_components() {
        let mut config = CompanionConfig::default();
        config.model = "m".to_string();
        config.request_timeout = Duration::from_secs(3);
        config.history_file = PathBuf::from("/tmp/h.json");

        let resolver = config.resolver();
        assert_eq!(resolver.model(), "m");
        assert_eq!(resolver.timeout(), Duration::from_secs(3));
        assert_eq!(config.history_log().path(), PathBuf::from("/tmp/h.json").as_path());
        assert_eq!(config.backend_config().request_timeout, Duration::from_secs(3));
        assert_eq!(config.backend_config().model, "m");
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("bad".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
