// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks values that deserialize fine but cannot be used as-is.

use crate::{ConfigError, ConfigResult, PoseStackConfig, LOG_LEVELS};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    UnknownLogLevel { level: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLogLevel { level } => {
                write!(
                    f,
                    "logging.level = '{}' is not one of {}",
                    level,
                    LOG_LEVELS.join(", ")
                )
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Every problem is collected before returning, so one run reports them all.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &PoseStackConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// All validation problems of `config`, in section order
pub fn collect_validation_errors(config: &PoseStackConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.staging.parallel_build && config.staging.parallel_min_frames == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "staging.parallel_min_frames".to_string(),
            reason: "must be at least 1 when staging.parallel_build is enabled".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::UnknownLogLevel {
            level: config.logging.level.clone(),
        });
    }

    errors
}
