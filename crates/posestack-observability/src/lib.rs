// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # posestack-observability
//!
//! Logging setup shared by posestack binaries and training harnesses, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log file per run, daily rotation

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known posestack crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "posestack",
    "posestack-structures",
    "posestack-staging",
    "posestack-config",
    "posestack-observability",
];
