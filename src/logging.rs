//! Logging utilities for plotrc.
//!
//! This module sets up the tracing subscriber for the command-line tool and
//! provides structured helpers for logging significant operations.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{PlotError, Result};

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set. Output goes to stderr so that
/// command results on stdout stay machine readable.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Log the start of a guide settings resolution
pub fn log_resolve_start(guide: &str, keywords: usize) {
    info!(guide = guide, keywords = keywords, "Resolving guide settings");
}

/// Log how a guide settings resolution ended
pub fn log_resolve_end<T>(guide: &str, start_time: Instant, result: &Result<T>) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(_) => info!(
            guide = guide,
            duration_ms = duration_ms,
            "Resolved guide settings"
        ),
        Err(error) => warn!(
            guide = guide,
            duration_ms = duration_ms,
            error = %error,
            "Guide settings rejected"
        ),
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = Uuid::new_v4();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log a summary of the rc settings applied at startup
pub fn log_rc_overrides(source: &str, keys: &[String]) {
    info!(
        operation = "rc_load",
        source = source,
        count = keys.len(),
        keys = %keys.join(", "),
        "Applied rc overrides"
    );
}

/// Log an error with the key or field it concerns
pub fn log_error(error: &PlotError, context: &str) {
    let subject = match error {
        PlotError::KeyNotFound { key }
        | PlotError::InvalidValue { key, .. }
        | PlotError::DefaultTable { key, .. } => key.as_str(),
        PlotError::InvalidSettings { field, .. }
        | PlotError::NotFinalized { field }
        | PlotError::AlreadyFinalized { field } => field.as_str(),
        PlotError::InvalidParameter { param, .. } => param.as_str(),
        PlotError::Config { .. } | PlotError::Io(_) | PlotError::Json(_) => "-",
    };
    error!(
        error = %error,
        context = context,
        subject = subject,
        "plotrc error"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_log_timed_operation() {
        let result = log_timed_operation("test_operation", || {
            std::thread::sleep(Duration::from_millis(1));
            42
        });

        assert_eq!(result, 42);
    }

    #[test]
    fn test_log_helpers_do_not_panic() {
        let start = Instant::now();
        log_resolve_start("colorbar", 3);
        log_rc_overrides("test", &["tick.len".to_string()]);
        let failed: Result<()> = Err(PlotError::NotFinalized {
            field: "extendfrac".to_string(),
        });
        log_resolve_end("colorbar", start, &failed);
        log_resolve_end("legend", start, &Ok(()));
        log_error(
            &PlotError::KeyNotFound {
                key: "missing".to_string(),
            },
            "lookup",
        );
    }
}
