// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # posestack
//!
//! Data staging for hand/pose-estimation training. Sequences of frames (color
//! image, depth map, joint ground truth, crop center) go in, dense normalized
//! tensors come out:
//!
//! - image stacks of shape (N, C, H, W), C = 3 for color and 1 for depth
//! - label stacks of shape (N, J, D), joints scaled by half the cube depth and
//!   clipped to [-1, 1]
//!
//! ## Quick Start
//!
//! ```
//! use posestack::prelude::*;
//! use ndarray::{Array2, Array3};
//!
//! let frame = Frame::new(
//!     Array3::from_elem((48, 64, 3), 200.0),
//!     Array2::from_elem((48, 64), 0.0),
//!     Array2::zeros((21, 3)),
//!     Array2::from_elem((21, 3), 300.0),
//!     [32.0, 24.0, 650.0],
//! ).unwrap();
//! let config = SequenceConfig::new(Cube::new([250.0, 250.0, 250.0]).unwrap());
//!
//! let mut dataset = Dataset::new(Some(vec![Sequence::new("train", vec![frame], config)]), CachePolicy::Retain);
//! let depth = dataset.depth_stack("train", NormalizationMode::Symmetric).unwrap().unwrap();
//!
//! assert_eq!(depth.images.shape(), &[1, 1, 48, 64]);
//! // holes sit on the far plane, labels saturate
//! assert_eq!(depth.images[[0, 0, 0, 0]], 1.0);
//! assert_eq!(depth.labels[[0, 0, 0]], 1.0);
//! ```

pub use posestack_config as config;
#[cfg(feature = "observability")]
pub use posestack_observability as observability;
pub use posestack_staging as staging;
pub use posestack_structures as structures;

pub use posestack_staging::{Dataset, SequenceRegistry, StackBuilder, StackCache};
pub use posestack_structures::{
    CachePolicy, Cube, Frame, NormalizationMode, Sequence, SequenceConfig, StackModality,
    StackPair, StagingError, StagingResult,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude with the types a training harness needs
pub mod prelude {
    pub use posestack_config::{PoseStackConfig, StagingConfig};
    pub use posestack_staging::{CacheStats, Dataset, SequenceRegistry, StackBuilder};
    pub use posestack_structures::{
        CachePolicy, Cube, Frame, NormalizationMode, Sequence, SequenceConfig, StackModality,
        StackPair, StagingError, StagingResult,
    };
}
