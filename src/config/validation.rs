//! Configuration validation module
//!
//! This module provides validation functions for the configuration
//! to ensure all settings are usable before the host builds any state.

use crate::utils::errors::{VuiStateError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_logging_config(&settings.logging)?;
    validate_state_limits(&settings.state.limits)?;

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        return Err(VuiStateError::Config(
            "Log level is required".to_string()
        ));
    }

    if let Err(e) = tracing_subscriber::EnvFilter::try_new(&config.level) {
        return Err(VuiStateError::Config(
            format!("Invalid log level directive '{}': {}", config.level, e)
        ));
    }

    if let Some(path) = &config.file_path {
        if path.trim().is_empty() {
            return Err(VuiStateError::Config(
                "Log file path must not be blank when set".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate state limits
fn validate_state_limits(limits: &super::StateLimits) -> Result<()> {
    if limits.max_answer_entries == 0 {
        return Err(VuiStateError::Config(
            "Max answer entries must be greater than 0".to_string()
        ));
    }

    if limits.max_token_depth == 0 {
        return Err(VuiStateError::Config(
            "Max token depth must be greater than 0".to_string()
        ));
    }

    // the empty state alone serializes to ~100 bytes
    if limits.max_serialized_size < 128 {
        return Err(VuiStateError::Config(
            "Max serialized size must be at least 128 bytes".to_string()
        ));
    }

    Ok(())
}
