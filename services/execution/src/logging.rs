//! Standardized emoji logging for swap execution
//!
//! Every swap state transition logs with one of these prefixes so a single
//! swap can be followed through the log by eye.

use anyhow::{Context, Result};
use gamm_config::GlobalConfig;
use tracing_subscriber::EnvFilter;

/// Standard emoji set for swap execution logging
pub struct LogEmoji;

impl LogEmoji {
    // Status indicators
    pub const SUCCESS: &'static str = "✅"; // Swap confirmed
    pub const ERROR: &'static str = "❌"; // Swap failed
    pub const WARNING: &'static str = "⚠️"; // Rejected or unexpected
    pub const INFO: &'static str = "ℹ️";

    pub const SEARCH: &'static str = "🔍"; // Estimation
    pub const POOL: &'static str = "🏊"; // Pool state
    pub const EXECUTE: &'static str = "⚡"; // Submission
    pub const CLOCK: &'static str = "⏱️"; // Timeouts
}

#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        tracing::info!("{} {}", $crate::logging::LogEmoji::SUCCESS, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("{} {}", $crate::logging::LogEmoji::ERROR, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_rejected {
    ($($arg:tt)*) => {
        tracing::warn!("{} {}", $crate::logging::LogEmoji::WARNING, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_estimate {
    ($($arg:tt)*) => {
        tracing::info!("{} {}", $crate::logging::LogEmoji::SEARCH, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_pool {
    ($($arg:tt)*) => {
        tracing::debug!("{} {}", $crate::logging::LogEmoji::POOL, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_execution {
    ($($arg:tt)*) => {
        tracing::info!("{} {}", $crate::logging::LogEmoji::EXECUTE, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_timeout {
    ($($arg:tt)*) => {
        tracing::error!("{} {}", $crate::logging::LogEmoji::CLOCK, format!($($arg)*))
    };
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `log_level` when set. Fails if a subscriber is
/// already installed.
pub fn init_logging(global: &GlobalConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&global.log_level)
            .with_context(|| format!("invalid log level '{}'", global.log_level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if global.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")?;

    tracing::info!(
        "{} {} logging initialized at {}",
        LogEmoji::INFO,
        global.service_name,
        global.log_level
    );
    Ok(())
}

