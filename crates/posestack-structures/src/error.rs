// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Common error type for posestack staging operations.
///
/// Unknown sequence names are not errors: lookups and stack requests return
/// `None` for those. Everything here is a structural problem with the data
/// handed over by the sequence producer.
///
/// # Examples
/// ```
/// use posestack_structures::StagingError;
///
/// fn check_frames(name: &str, count: usize) -> Result<(), StagingError> {
///     if count == 0 {
///         return Err(StagingError::EmptySequence { name: name.into() });
///     }
///     Ok(())
/// }
///
/// assert!(check_frames("train", 0).is_err());
/// assert!(check_frames("train", 12).is_ok());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StagingError {
    /// A sequence without frames cannot have its stack shape inferred
    #[error("Sequence '{name}' has no frames, stack shape cannot be inferred")]
    EmptySequence { name: String },

    /// A frame disagrees with frame 0 on the shape of one of its arrays
    #[error("Shape mismatch in frame {frame} field '{field}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        frame: usize,
        field: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A frame failed validation on construction
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// The sequence cube cannot be used to scale depth and labels
    #[error("Invalid cube {cube:?}: {reason}")]
    InvalidCube { cube: [f32; 3], reason: String },

    /// Internal error indicating a bug (please report)
    #[error("Internal error, please raise an issue: {0}")]
    Internal(String),
}

/// Result type for staging operations
pub type StagingResult<T> = Result<T, StagingError>;
