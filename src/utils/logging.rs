//! Logging configuration and setup
//!
//! This module provides logging initialization and the structured log
//! helpers used by the state container and the flow tree.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::{VuiStateError, Result};

/// Initialize logging based on configuration
///
/// Returns the file appender guard when a log directory is configured; the
/// caller must keep it alive for buffered lines to be flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| VuiStateError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "vui-state.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let text_layer = (!config.json).then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VuiStateError::LoggingInit(e.to_string()))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a change of the current flow
pub fn log_flow_change(from: Option<&str>, to: &str) {
    debug!(
        from = from,
        to = to,
        "Current flow changed"
    );
}

/// Log a prompt being recorded as the last one presented
pub fn log_prompt_presented(token: &str, count: Option<u64>) {
    debug!(
        token = token,
        count = count,
        "Prompt presented"
    );
}

/// Log a token that normalized to nothing and was ignored
pub fn log_degenerate_token(operation: &str, raw: &str) {
    debug!(
        operation = operation,
        raw = raw,
        "Ignoring degenerate token"
    );
}

/// Log a write that was blocked by an existing value on the path
pub fn log_blocked_path(operation: &str, token: &str) {
    warn!(
        operation = operation,
        token = token,
        "Token path is blocked by an existing leaf value"
    );
}

/// Log a flow that could not be renamed or attached
pub fn log_flow_rejected(action: &str, name: &str, reason: &str) {
    warn!(
        action = action,
        name = name,
        reason = reason,
        "Flow operation rejected"
    );
}
