// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-frame training sample.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::error::{StagingError, StagingResult};

/// Number of color channels a frame carries (RGB).
pub const COLOR_CHANNELS: usize = 3;

/// Depth value marking a pixel without measurement.
pub const DEPTH_HOLE: f32 = 0.0;

/// One sample of a sequence.
///
/// Arrays are stored in their native row-major layout:
/// - `color`: (height, width, 3), RGB
/// - `dpt`: (height, width), 0 marks a depth hole
/// - `gtorig`, `gt3dcrop`: (joints, dimensions)
///
/// `com` is the crop center, its third component is a depth in `dpt` units.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    color: Array3<f32>,
    dpt: Array2<f32>,
    gtorig: Array2<f32>,
    gt3dcrop: Array2<f32>,
    com: [f32; 3],
}

impl Frame {
    /// Creates a frame, validating the per-frame shape invariants.
    ///
    /// # Errors
    /// Returns [`StagingError::InvalidFrame`] if the color image does not have
    /// exactly three channels, if the two joint arrays disagree on shape, or if
    /// `com` is not finite.
    pub fn new(
        color: Array3<f32>,
        dpt: Array2<f32>,
        gtorig: Array2<f32>,
        gt3dcrop: Array2<f32>,
        com: [f32; 3],
    ) -> StagingResult<Frame> {
        if color.shape()[2] != COLOR_CHANNELS {
            return Err(StagingError::InvalidFrame(format!(
                "color must have {} channels, got shape {:?}",
                COLOR_CHANNELS,
                color.shape()
            )));
        }
        if gtorig.shape() != gt3dcrop.shape() {
            return Err(StagingError::InvalidFrame(format!(
                "gtorig shape {:?} does not match gt3Dcrop shape {:?}",
                gtorig.shape(),
                gt3dcrop.shape()
            )));
        }
        if com.iter().any(|c| !c.is_finite()) {
            return Err(StagingError::InvalidFrame(format!(
                "com must be finite, got {:?}",
                com
            )));
        }
        Ok(Frame {
            color,
            dpt,
            gtorig,
            gt3dcrop,
            com,
        })
    }

    pub fn color(&self) -> ArrayView3<'_, f32> {
        self.color.view()
    }

    pub fn dpt(&self) -> ArrayView2<'_, f32> {
        self.dpt.view()
    }

    pub fn gtorig(&self) -> ArrayView2<'_, f32> {
        self.gtorig.view()
    }

    pub fn gt3dcrop(&self) -> ArrayView2<'_, f32> {
        self.gt3dcrop.view()
    }

    pub fn com(&self) -> [f32; 3] {
        self.com
    }

    /// (height, width) of the color image.
    pub fn color_resolution(&self) -> (usize, usize) {
        (self.color.shape()[0], self.color.shape()[1])
    }

    /// (height, width) of the depth map.
    pub fn depth_resolution(&self) -> (usize, usize) {
        (self.dpt.shape()[0], self.dpt.shape()[1])
    }

    /// (joints, dimensions) of the ground truth.
    pub fn joint_dimensions(&self) -> (usize, usize) {
        (self.gtorig.shape()[0], self.gtorig.shape()[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joints() -> Array2<f32> {
        Array2::zeros((14, 3))
    }

    #[test]
    fn test_new_valid_frame() {
        let frame = Frame::new(
            Array3::zeros((4, 6, 3)),
            Array2::zeros((4, 6)),
            joints(),
            joints(),
            [1.0, 2.0, 500.0],
        )
        .unwrap();
        assert_eq!(frame.color_resolution(), (4, 6));
        assert_eq!(frame.depth_resolution(), (4, 6));
        assert_eq!(frame.joint_dimensions(), (14, 3));
        assert_eq!(frame.com()[2], 500.0);
    }

    #[test]
    fn test_rejects_non_rgb_color() {
        let result = Frame::new(
            Array3::zeros((4, 6, 4)),
            Array2::zeros((4, 6)),
            joints(),
            joints(),
            [0.0; 3],
        );
        assert!(matches!(result, Err(StagingError::InvalidFrame(_))));
    }

    #[test]
    fn test_rejects_mismatched_joint_arrays() {
        let result = Frame::new(
            Array3::zeros((4, 6, 3)),
            Array2::zeros((4, 6)),
            Array2::zeros((14, 3)),
            Array2::zeros((16, 3)),
            [0.0; 3],
        );
        assert!(matches!(result, Err(StagingError::InvalidFrame(_))));
    }

    #[test]
    fn test_rejects_nan_com() {
        let result = Frame::new(
            Array3::zeros((2, 2, 3)),
            Array2::zeros((2, 2)),
            joints(),
            joints(),
            [0.0, f32::NAN, 0.0],
        );
        assert!(result.is_err());
    }
}
