//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ConciergeBot engine.

use tracing::{info, warn, debug};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// Returns the file writer's guard; dropping it stops log flushing, so the
/// caller must keep it alive for the lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "conciergebot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the outcome of a recognition pass
pub fn log_recognition(conversation_id: &str, intent: &str, score: f32) {
    debug!(
        conversation_id = conversation_id,
        intent = intent,
        score = score,
        "Utterance recognized"
    );
}

/// Log a denied interruption
pub fn log_interruption_denied(conversation_id: &str, active_dialog: &str, requested: &str) {
    info!(
        conversation_id = conversation_id,
        active_dialog = active_dialog,
        requested = requested,
        "Interruption denied"
    );
}

/// Log a dialog lifecycle event
pub fn log_dialog_event(conversation_id: &str, dialog: &str, event: &str) {
    info!(
        conversation_id = conversation_id,
        dialog = dialog,
        event = event,
        "Dialog event"
    );
}

/// Log a turn that ended in the generic error path
pub fn log_turn_failure(conversation_id: &str, error: &str) {
    warn!(
        conversation_id = conversation_id,
        error = error,
        "Turn failed, generic apology sent"
    );
}
