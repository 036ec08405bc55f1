use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title shown in the dialog header
    pub modal_title: String,

    /// Route mouse clicks to the page and the dialog
    pub mouse_enabled: bool,

    /// Idle tick interval of the event loop
    pub tick_rate_ms: u64,

    /// Dim the page while the dialog is open
    pub background_dim: bool,

    /// Close the dialog when the backdrop is clicked
    pub close_on_backdrop: bool,

    /// Render the built-in "Close modal" control
    pub show_close_control: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modal_title: "Random facts".to_string(),
            mouse_enabled: true,
            tick_rate_ms: 100,
            background_dim: true,
            close_on_backdrop: false,
            show_close_control: true,
        }
    }
}

impl Config {
    /// Initialize configuration from defaults, a config file and the environment
    pub async fn init(explicit_path: Option<&Path>) -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match explicit_path {
            Some(path) => Self::load_from_path(path).await?,
            None => Self::load_from_file().await?.unwrap_or_default(),
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Search the usual locations for a configuration file
    pub async fn load_from_file() -> Result<Option<Self>> {
        // Priority:
        // 1. ./.focus-modal.json
        // 2. ./focus-modal.json
        // 3. $CONFIG_DIR/focus-modal/config.json
        let mut config_paths = vec![
            PathBuf::from("./.focus-modal.json"),
            PathBuf::from("./focus-modal.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("focus-modal").join("config.json"));
        }

        for path in config_paths {
            if path.exists() {
                return Ok(Some(Self::load_from_path(&path).await?));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Load a configuration file; missing keys keep their defaults
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration overrides from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    /// Apply `FOCUS_MODAL_*` overrides read through `lookup`
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(title) = lookup("FOCUS_MODAL_TITLE") {
            self.modal_title = title;
        }

        if let Some(value) = lookup("FOCUS_MODAL_MOUSE") {
            self.mouse_enabled = parse_flag(&value, self.mouse_enabled);
        }

        if let Some(value) = lookup("FOCUS_MODAL_TICK_RATE_MS") {
            if let Ok(tick_rate) = value.parse() {
                self.tick_rate_ms = tick_rate;
            }
        }

        if let Some(value) = lookup("FOCUS_MODAL_BACKGROUND_DIM") {
            self.background_dim = parse_flag(&value, self.background_dim);
        }

        if let Some(value) = lookup("FOCUS_MODAL_CLOSE_ON_BACKDROP") {
            self.close_on_backdrop = parse_flag(&value, self.close_on_backdrop);
        }

        if let Some(value) = lookup("FOCUS_MODAL_SHOW_CLOSE_CONTROL") {
            self.show_close_control = parse_flag(&value, self.show_close_control);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_rate_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.modal_title, "Random facts");
        assert!(config.mouse_enabled);
        assert!(config.background_dim);
        assert!(!config.close_on_backdrop);
        assert!(config.show_close_control);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"modal_title": "Trivia", "close_on_backdrop": true}"#).unwrap();

        let config = Config::load_from_path(&config_path).await.unwrap();

        assert_eq!(config.modal_title, "Trivia");
        assert!(config.close_on_backdrop);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = Config::load_from_path(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");

        assert!(Config::init(Some(missing.as_path())).await.is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let config = Config {
            tick_rate_ms: 0,
            ..Config::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides_every_field() {
        let vars: std::collections::HashMap<&str, &str> = [
            ("FOCUS_MODAL_TITLE", "Facts"),
            ("FOCUS_MODAL_MOUSE", "off"),
            ("FOCUS_MODAL_TICK_RATE_MS", "250"),
            ("FOCUS_MODAL_BACKGROUND_DIM", "no"),
            ("FOCUS_MODAL_CLOSE_ON_BACKDROP", "yes"),
            ("FOCUS_MODAL_SHOW_CLOSE_CONTROL", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|name| vars.get(name).map(|value| value.to_string()));

        assert_eq!(config.modal_title, "Facts");
        assert!(!config.mouse_enabled);
        assert_eq!(config.tick_rate_ms, 250);
        assert!(!config.background_dim);
        assert!(config.close_on_backdrop);
        assert!(!config.show_close_control);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("yes", false));
        assert!(!parse_flag("OFF", true));
        assert!(parse_flag("maybe", true));
    }
}
