// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Scalar normalization rules shared by the color, depth and label fills.

use posestack_structures::frame::DEPTH_HOLE;
use posestack_structures::{Cube, NormalizationMode};

const COLOR_ZERO_ONE_SCALE: f32 = 256.0;
const COLOR_MIDPOINT: f32 = 128.0;

/// Normalizes one color intensity sample.
///
/// For inputs in [0, 255], zero-one lands in [0, 1) and symmetric in [-1, 1).
#[inline]
pub fn normalize_color(value: f32, mode: NormalizationMode) -> f32 {
    match mode {
        NormalizationMode::ZeroOne => value / COLOR_ZERO_ONE_SCALE,
        NormalizationMode::Symmetric => (value - COLOR_MIDPOINT) / COLOR_MIDPOINT,
    }
}

/// Depth scaling for a single frame: the frame's crop center plus the
/// sequence cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthScale {
    com_depth: f32,
    cube_depth: f32,
}

impl DepthScale {
    pub fn new(com: [f32; 3], cube: Cube) -> DepthScale {
        DepthScale {
            com_depth: com[2],
            cube_depth: cube.depth(),
        }
    }

    fn half_depth(&self) -> f32 {
        self.cube_depth / 2.0
    }

    /// Depth that replaces a hole: the far plane of the crop volume.
    #[inline]
    pub fn far_plane(&self) -> f32 {
        self.com_depth + self.half_depth()
    }

    /// Near plane of the crop volume, mapped to 0 in zero-one mode.
    #[inline]
    pub fn near_plane(&self) -> f32 {
        self.com_depth - self.half_depth()
    }

    /// Normalizes one depth sample. Holes are substituted before scaling.
    #[inline]
    pub fn normalize(&self, depth: f32, mode: NormalizationMode) -> f32 {
        let depth = if depth == DEPTH_HOLE {
            self.far_plane()
        } else {
            depth
        };
        match mode {
            NormalizationMode::ZeroOne => (depth - self.near_plane()) / self.cube_depth,
            NormalizationMode::Symmetric => (depth - self.com_depth) / self.half_depth(),
        }
    }
}

/// Normalizes one crop-relative joint coordinate into [-1, 1].
///
/// Values beyond half the cube depth saturate at the boundary.
#[inline]
pub fn normalize_label(value: f32, cube: Cube) -> f32 {
    (value / cube.half_depth()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cube() -> Cube {
        Cube::new([200.0, 200.0, 200.0]).unwrap()
    }

    #[test]
    fn test_color_zero_one_range() {
        assert_eq!(normalize_color(0.0, NormalizationMode::ZeroOne), 0.0);
        let top = normalize_color(255.0, NormalizationMode::ZeroOne);
        assert!(top < 1.0);
        assert_abs_diff_eq!(top, 255.0 / 256.0);
    }

    #[test]
    fn test_color_symmetric_range() {
        assert_eq!(normalize_color(0.0, NormalizationMode::Symmetric), -1.0);
        assert_eq!(normalize_color(128.0, NormalizationMode::Symmetric), 0.0);
        assert!(normalize_color(255.0, NormalizationMode::Symmetric) <= 1.0);
    }

    #[test]
    fn test_depth_crop_boundaries() {
        let scale = DepthScale::new([0.0, 0.0, 500.0], cube());
        assert_abs_diff_eq!(scale.normalize(400.0, NormalizationMode::ZeroOne), 0.0);
        assert_abs_diff_eq!(scale.normalize(600.0, NormalizationMode::ZeroOne), 1.0);
        assert_abs_diff_eq!(scale.normalize(500.0, NormalizationMode::ZeroOne), 0.5);
        assert_abs_diff_eq!(scale.normalize(400.0, NormalizationMode::Symmetric), -1.0);
        assert_abs_diff_eq!(scale.normalize(600.0, NormalizationMode::Symmetric), 1.0);
        assert_abs_diff_eq!(scale.normalize(500.0, NormalizationMode::Symmetric), 0.0);
    }

    #[test]
    fn test_depth_hole_is_far_plane() {
        let scale = DepthScale::new([10.0, 20.0, 730.0], cube());
        for mode in [NormalizationMode::ZeroOne, NormalizationMode::Symmetric] {
            assert_eq!(scale.normalize(0.0, mode), scale.normalize(scale.far_plane(), mode));
        }
        assert_eq!(scale.normalize(0.0, NormalizationMode::ZeroOne), 1.0);
        assert_eq!(scale.normalize(0.0, NormalizationMode::Symmetric), 1.0);
    }

    #[test]
    fn test_depth_is_not_clipped() {
        let scale = DepthScale::new([0.0, 0.0, 500.0], cube());
        assert!(scale.normalize(900.0, NormalizationMode::Symmetric) > 1.0);
    }

    #[test]
    fn test_label_saturates() {
        assert_eq!(normalize_label(150.0, cube()), 1.0);
        assert_eq!(normalize_label(-101.0, cube()), -1.0);
        assert_abs_diff_eq!(normalize_label(50.0, cube()), 0.5);
        assert_eq!(normalize_label(100.0, cube()), 1.0);
    }
}
