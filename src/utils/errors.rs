//! Error handling for vui-state
//!
//! This module defines the error type shared by the state container, the
//! configuration layer and logging setup.
//!
//! Token and flow operations never return these errors: invalid tokens are
//! handled as silent no-ops so that a malformed prompt identifier cannot end
//! a dialogue turn. Errors are reserved for decoding serialized state,
//! loading configuration and installing the logger.

use thiserror::Error;

/// Main error type for vui-state
#[derive(Error, Debug)]
pub enum VuiStateError {
    #[error("Failed to parse serialized state: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("State limit exceeded: {what} ({actual} > {limit})")]
    LimitExceeded { what: String, actual: usize, limit: usize },

    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

/// Result type alias for vui-state operations
pub type Result<T> = std::result::Result<T, VuiStateError>;

impl VuiStateError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            VuiStateError::Parse(_) => false,
            VuiStateError::Config(_) => false,
            VuiStateError::ConfigSource(_) => false,
            VuiStateError::TomlParse(_) => false,
            VuiStateError::LimitExceeded { .. } => true,
            VuiStateError::LoggingInit(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VuiStateError::Config(_) => ErrorSeverity::Critical,
            VuiStateError::ConfigSource(_) => ErrorSeverity::Critical,
            VuiStateError::TomlParse(_) => ErrorSeverity::Critical,
            VuiStateError::LimitExceeded { .. } => ErrorSeverity::Warning,
            VuiStateError::LoggingInit(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
