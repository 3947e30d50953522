// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for posestack
//!
//! Console output always; with the `file-logging` feature, a JSON log file per
//! run under a timestamped folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use posestack_config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Keeps file writers alive; drop it only at shutdown so buffered logs flush
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder holding this run's log file, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the filter from the configured level and per-crate debug flags
pub fn build_filter(debug_flags: &CrateDebugFlags, logging: &LoggingConfig) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string(&logging.level.to_lowercase());
    EnvFilter::try_new(&directives).with_context(|| format!("Invalid log filter: {}", directives))
}

/// Initialize the global subscriber
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `logging` - Level and console format
/// * `log_dir` - Base directory for log files, ignored without `file-logging`
///
/// # Errors
/// Fails on an unparseable level, if the log folder cannot be created, or if a
/// global subscriber is already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    logging: &LoggingConfig,
    log_dir: Option<PathBuf>,
) -> Result<LoggingGuard> {
    let mut layers = Vec::new();

    let console_layer = match logging.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(build_filter(debug_flags, logging)?)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(build_filter(debug_flags, logging)?)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, run_folder) = match log_dir {
        Some(base_log_dir) => {
            let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
            let run_folder = base_log_dir.join(format!("run_{}", timestamp));
            std::fs::create_dir_all(&run_folder)
                .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

            let appender = tracing_appender::rolling::daily(&run_folder, "posestack.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .with_filter(build_filter(debug_flags, logging)?)
                    .boxed(),
            );
            (vec![guard], Some(run_folder))
        }
        None => (Vec::new(), None),
    };

    #[cfg(not(feature = "file-logging"))]
    let run_folder: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    warn_ignored_log_dir(log_dir.as_deref());

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

#[cfg(not(feature = "file-logging"))]
fn warn_ignored_log_dir(log_dir: Option<&Path>) {
    if let Some(dir) = log_dir {
        tracing::warn!(
            "[LOGGING] Built without file-logging, ignoring log directory {}",
            dir.display()
        );
    }
}

/// Initialize console logging from flags and config defaults
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default(), None)
}
