//! Library settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::errors::Result;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub state: StateConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `vui_state=debug`
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_path: Option<String>,
    /// Emit JSON lines instead of the human readable format
    pub json: bool,
}

/// Defaults applied to every state built by the host app
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StateConfig {
    /// Start new states with prompt count auto-increment enabled
    pub auto_increment_prompts: bool,
    pub limits: StateLimits,
}

/// Upper bounds a host can enforce before persisting a state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StateLimits {
    /// Maximum number of gathered answer leaves
    pub max_answer_entries: usize,
    /// Maximum number of segments in any stored token path
    pub max_token_depth: usize,
    /// Maximum length of the serialized state in bytes
    pub max_serialized_size: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            json: false,
        }
    }
}

impl Default for StateLimits {
    fn default() -> Self {
        Self {
            max_answer_entries: 256,
            max_token_depth: 16,
            max_serialized_size: 1024 * 64, // 64KB
        }
    }
}

impl Settings {
    /// Load settings from an optional `vui_state` config file and
    /// `VUI_STATE__*` environment variables
    pub fn new() -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("vui_state").required(false))
            .add_source(
                config::Environment::with_prefix("VUI_STATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load settings from a specific file; format is taken from the extension
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Parse settings from an inline TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }
}
