//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output
//! - JSON-formatted local file logging with daily or hourly rotation
//! - Configurable log levels
//!
//! # Example
//!
//! ```no_run
//! use geodoc::logging::init_logging;
//! use geodoc::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of one export unit
///
/// # Example
///
/// ```no_run
/// use geodoc::log_unit_start;
///
/// let run_id = uuid::Uuid::new_v4();
/// log_unit_start!(run_id, 0, 12, "company_9/project_1/estimate_10/a.pdf");
/// ```
#[macro_export]
macro_rules! log_unit_start {
    ($run_id:expr, $index:expr, $total:expr, $output_path:expr) => {
        tracing::info!(
            run_id = %$run_id,
            unit_index = $index,
            total_units = $total,
            output_path = %$output_path,
            "Processing unit"
        );
    };
}

/// Log batch progress after a unit completes
///
/// # Example
///
/// ```no_run
/// use geodoc::log_batch_progress;
///
/// log_batch_progress!(3, 12);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($completed:expr, $total:expr) => {
        tracing::debug!(
            completed = $completed,
            total = $total,
            progress_pct = ($completed as f64 / $total as f64 * 100.0),
            "Batch progress"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use geodoc::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 2000u64, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying request"
        );
    };
}
