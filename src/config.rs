// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    pub debug: DebugConfig,
    pub server: ServerConfig,
}

/// Metadata returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub apiversion: String,
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Move selector settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SelectorConfig {
    /// Fixed seed for the process-wide generator; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Decision log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// HTTP server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server_header: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            appearance: AppearanceConfig {
                apiversion: "1".to_string(),
                author: "cautious-snake".to_string(),
                color: "#20b2aa".to_string(),
                head: "gamer".to_string(),
                tail: "rbc-necktie".to_string(),
            },
            selector: SelectorConfig { seed: None },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
            server: ServerConfig {
                server_header: "battlesnake/github/cautious-snake".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.appearance.apiversion, "1");
        assert!(config.selector.seed.is_none());
        assert!(!config.debug.enabled);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_snake_toml_matches_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(
            file_config.appearance.color,
            hardcoded_config.appearance.color
        );
        assert_eq!(file_config.appearance.head, hardcoded_config.appearance.head);
        assert_eq!(file_config.appearance.tail, hardcoded_config.appearance.tail);
        assert_eq!(file_config.selector.seed, hardcoded_config.selector.seed);
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(
            file_config.debug.log_file_path,
            hardcoded_config.debug.log_file_path
        );
        assert_eq!(
            file_config.server.server_header,
            hardcoded_config.server.server_header
        );
    }

    #[test]
    fn test_selector_section_is_optional() {
        let config = Config::from_toml_str(
            r##"
            [appearance]
            apiversion = "1"
            author = "someone"
            color = "#000000"
            head = "default"
            tail = "default"

            [debug]
            enabled = false
            log_file_path = "x.jsonl"

            [server]
            server_header = "test"
            "##,
        )
        .unwrap();

        assert!(config.selector.seed.is_none());
    }

    #[test]
    fn test_seed_is_read() {
        let text = r##"
            [appearance]
            apiversion = "1"
            author = ""
            color = "#000000"
            head = "default"
            tail = "default"

            [selector]
            seed = 1234

            [debug]
            enabled = true
            log_file_path = "x.jsonl"

            [server]
            server_header = "test"
        "##;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.selector.seed, Some(1234));
        assert!(config.debug.enabled);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        assert!(Config::from_file("nonexistent.toml").is_err());
        assert!(Config::from_toml_str("[appearance]\ncolor = 3").is_err());
    }
}
