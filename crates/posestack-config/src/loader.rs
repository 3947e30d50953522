// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LogFormat, PoseStackConfig};
use posestack_structures::{CachePolicy, NormalizationMode};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "posestack_configuration.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "POSESTACK_CONFIG_PATH";

/// Find the posestack configuration file
///
/// Search order:
/// 1. `POSESTACK_CONFIG_PATH` environment variable
/// 2. Current working directory: `./posestack_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<PoseStackConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: PoseStackConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `POSESTACK_CACHE_POLICY` -> `staging.cache_policy` (`retain` | `discard`)
/// - `POSESTACK_NORMALIZATION` -> `staging.default_normalization` (`zero_one` | `symmetric`)
/// - `POSESTACK_PARALLEL_BUILD` -> `staging.parallel_build`
/// - `POSESTACK_LOG_LEVEL` -> `logging.level`
/// - `POSESTACK_LOG_FORMAT` -> `logging.format` (`text` | `json`)
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut PoseStackConfig) {
    let overrides: HashMap<String, String> = [
        ("POSESTACK_CACHE_POLICY", "cache_policy"),
        ("POSESTACK_NORMALIZATION", "normalization"),
        ("POSESTACK_PARALLEL_BUILD", "parallel_build"),
        ("POSESTACK_LOG_LEVEL", "log_level"),
        ("POSESTACK_LOG_FORMAT", "log_format"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &overrides);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"cache_policy": "discard", "log_level": "debug"}`)
///
/// Values that do not parse leave the field unchanged. Front ends that take
/// these values from a user should check them first with [`parse_cache_policy`]
/// and [`parse_normalization`].
pub fn apply_cli_overrides(config: &mut PoseStackConfig, cli_args: &HashMap<String, String>) {
    if let Some(policy) = cli_args.get("cache_policy").and_then(|v| parse_cache_policy(v)) {
        config.staging.cache_policy = policy;
    }
    if let Some(mode) = cli_args.get("normalization").and_then(|v| parse_normalization(v)) {
        config.staging.default_normalization = mode;
    }
    if let Some(value) = cli_args.get("parallel_build") {
        config.staging.parallel_build = parse_flag(value);
    }
    if let Some(value) = cli_args.get("parallel_min_frames") {
        if let Ok(frames) = value.parse::<usize>() {
            config.staging.parallel_min_frames = frames;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.to_lowercase();
    }
    if let Some(format) = cli_args.get("log_format").and_then(|v| parse_log_format(v)) {
        config.logging.format = format;
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Parse a cache policy name (`retain` | `discard`, case-insensitive)
pub fn parse_cache_policy(value: &str) -> Option<CachePolicy> {
    match value.to_lowercase().as_str() {
        "retain" => Some(CachePolicy::Retain),
        "discard" => Some(CachePolicy::Discard),
        _ => None,
    }
}

/// Parse a normalization mode name (`zero_one` | `symmetric`, case-insensitive)
pub fn parse_normalization(value: &str) -> Option<NormalizationMode> {
    match value.to_lowercase().as_str() {
        "zero_one" => Some(NormalizationMode::ZeroOne),
        "symmetric" => Some(NormalizationMode::Symmetric),
        _ => None,
    }
}

fn parse_log_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "text" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}
