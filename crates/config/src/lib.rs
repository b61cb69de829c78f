//! Configuration loading, validation, and management for Leasebot.
//!
//! Loads configuration from `~/.leasebot/config.toml` with environment
//! variable overrides, and the bot's dialogue data (transitions and phrase
//! banks) from JSON. Everything is validated at startup.

pub mod bot_data;

pub use bot_data::BotData;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.leasebot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Where saved summaries live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dialogue data and randomness
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:4200".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "file" or "memory"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Directory for `summary_NN.json` files. Defaults to `~/.leasebot/summaries`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_dir: Option<PathBuf>,
}

fn default_storage_backend() -> String {
    "file".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            summary_dir: None,
        }
    }
}

impl StorageConfig {
    /// The summary directory, falling back to the default location.
    pub fn resolved_summary_dir(&self) -> PathBuf {
        self.summary_dir
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("summaries"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Directory with `transitions.json`, `questions.json`, `fallback.json`
    /// and `greetings.json`. Files missing there fall back to the built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Fixed seed for phrase selection (reproducible conversations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

const STORAGE_BACKENDS: &[&str] = &["file", "memory"];

impl AppConfig {
    /// Load configuration from the default path (~/.leasebot/config.toml).
    ///
    /// Environment variables take precedence over the file:
    /// - `LEASEBOT_DATA_DIR`
    /// - `LEASEBOT_SUMMARY_DIR`
    /// - `LEASEBOT_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up through `var` (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("LEASEBOT_DATA_DIR") {
            self.dialogue.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = var("LEASEBOT_SUMMARY_DIR") {
            self.storage.summary_dir = Some(PathBuf::from(dir));
        }
        if let Some(port) = var("LEASEBOT_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("LEASEBOT_PORT is not a valid port: {port}"))
            })?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".leasebot")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must be greater than 0".into(),
            ));
        }

        // The store opener falls back to the file store for anything else.
        if !STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            tracing::warn!(
                backend = %self.storage.backend,
                known = ?STORAGE_BACKENDS,
                "Unknown storage backend"
            );
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for leasebot_core::Error {
    fn from(e: ConfigError) -> Self {
        leasebot_core::Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.storage.backend, "file");
        assert!(config.dialogue.seed.is_none());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.gateway.allowed_origins, config.gateway.allowed_origins);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let toml_str = r#"
[storage]
backend = "memory"

[dialogue]
seed = 42
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.dialogue.seed, Some(42));
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn unknown_backend_only_warns() {
        let mut config = AppConfig::default();
        config.storage.backend = "postgres".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = AppConfig::default();
        config.gateway.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.storage.backend, "file");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[gateway\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(tmp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn overrides_take_precedence() {
        let vars: HashMap<&str, &str> = [
            ("LEASEBOT_DATA_DIR", "/srv/leasebot/data"),
            ("LEASEBOT_SUMMARY_DIR", "/srv/leasebot/summaries"),
            ("LEASEBOT_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.gateway.port, 9000);
        assert_eq!(
            config.storage.resolved_summary_dir(),
            PathBuf::from("/srv/leasebot/summaries")
        );
        assert_eq!(
            config.dialogue.data_dir,
            Some(PathBuf::from("/srv/leasebot/data"))
        );
    }

    #[test]
    fn bad_port_override_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|name| {
            (name == "LEASEBOT_PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8080"));
        assert!(toml_str.contains("backend = \"file\""));
    }
}
