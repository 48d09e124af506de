//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the SEES client.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::models::ViewerRole;
use crate::utils::errors::{SeesError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for as long as the process logs to a file.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| SeesError::Config(format!("Invalid log filter {}: {}", config.level, e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "sees-client.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| SeesError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log event actions performed by the viewer
pub fn log_event_action(event_id: i64, action: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log a committed visibility change on a quiz or material
pub fn log_visibility_change(kind: &str, item_id: i64, event_id: i64, visible: bool) {
    info!(
        kind = kind,
        item_id = item_id,
        event_id = event_id,
        visible = visible,
        "Visibility updated"
    );
}

/// Log classification results
pub fn log_classification(organizing: usize, speaking: usize, attending: usize, dropped: usize, skipped: usize) {
    debug!(
        organizing = organizing,
        speaking = speaking,
        attending = attending,
        dropped = dropped,
        skipped = skipped,
        "Events classified"
    );
}

/// Log a rejected action for the given role
pub fn log_permission_denied(action: &str, role: Option<ViewerRole>, event_id: i64) {
    warn!(
        action = action,
        role = ?role,
        event_id = event_id,
        "Action not permitted for viewer role"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log an API round trip
pub fn log_api_call(method: &str, endpoint: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            method = method,
            endpoint = endpoint,
            duration_ms = duration_ms,
            "API call completed"
        );
    } else {
        warn!(
            method = method,
            endpoint = endpoint,
            duration_ms = duration_ms,
            "API call failed"
        );
    }
}
