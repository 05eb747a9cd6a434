// ABOUTME: Configuration loading for the confab TUI
// ABOUTME: TOML config in the XDG config dir with sensible defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the agent backend
    pub backend_url: String,
    /// Request timeout in seconds for backend calls
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Get the XDG config directory for confab (~/.config/confab)
    pub fn config_dir() -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|p| p.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("."))
            })
            .join("confab")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load config from the XDG config directory, falling back to defaults
    /// when no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    /// Generate a default config file content
    pub fn default_toml() -> String {
        r#"# confab configuration
# Location: ~/.config/confab/config.toml

# Base URL of the agent backend
backend_url = "http://127.0.0.1:8000"

# Request timeout in seconds for backend calls
timeout_secs = 30
"#
        .to_string()
    }

    /// Initialize the config directory and create a default config if needed
    pub fn init() -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_path();

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config dir: {}", config_dir.display()))?;

        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_toml())
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config: Config = toml::from_str(r#"backend_url = "http://10.0.0.1:9000""#).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.1:9000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_default_toml_parses_back() {
        let config: Config = toml::from_str(&Config::default_toml()).unwrap();
        assert_eq!(config.backend_url, Config::default().backend_url);
        assert_eq!(config.timeout_secs, Config::default().timeout_secs);
    }

    #[test]
    fn test_config_dir_ends_with_confab() {
        assert!(Config::config_dir().ends_with("confab"));
        assert!(Config::config_path().ends_with("confab/config.toml"));
    }
}
