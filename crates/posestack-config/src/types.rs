// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the configuration structs that map to sections in
//! `posestack_configuration.toml`.

use posestack_structures::{CachePolicy, NormalizationMode};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoseStackConfig {
    pub staging: StagingConfig,
    pub logging: LoggingConfig,
}

/// Stack building and caching
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StagingConfig {
    /// `retain` keeps built stacks until the sequences are replaced, `discard`
    /// rebuilds on every request
    pub cache_policy: CachePolicy,
    pub default_normalization: NormalizationMode,
    /// Fill frames on the rayon pool
    pub parallel_build: bool,
    /// Sequences shorter than this are filled sequentially even when
    /// `parallel_build` is set
    pub parallel_min_frames: usize,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            cache_policy: CachePolicy::Retain,
            default_normalization: NormalizationMode::Symmetric,
            parallel_build: false,
            parallel_min_frames: 64,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
