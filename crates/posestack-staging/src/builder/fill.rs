// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-frame writers into one slot (axis 0 index) of a stack.
//!
//! Callers guarantee the slot shapes match the frame, see [`super::StackShape::infer`].

use ndarray::{ArrayViewMut2, ArrayViewMut3, Axis, Zip};
use posestack_structures::{Cube, Frame, NormalizationMode};

use super::normalization::{normalize_color, normalize_label, DepthScale};

/// Writes the normalized color image as (C, H, W).
pub fn fill_color(mut slot: ArrayViewMut3<f32>, frame: &Frame, mode: NormalizationMode) {
    // frame color is (H, W, C)
    let channels_first = frame.color().permuted_axes([2, 0, 1]);
    Zip::from(&mut slot)
        .and(&channels_first)
        .for_each(|dst, &src| *dst = normalize_color(src, mode));
}

/// Writes the normalized depth map as (1, H, W).
pub fn fill_depth(mut slot: ArrayViewMut3<f32>, frame: &Frame, cube: Cube, mode: NormalizationMode) {
    let scale = DepthScale::new(frame.com(), cube);
    Zip::from(slot.index_axis_mut(Axis(0), 0))
        .and(&frame.dpt())
        .for_each(|dst, &src| *dst = scale.normalize(src, mode));
}

/// Writes the clipped crop-relative joints as (J, D).
pub fn fill_labels(mut slot: ArrayViewMut2<f32>, frame: &Frame, cube: Cube) {
    Zip::from(&mut slot)
        .and(&frame.gt3dcrop())
        .for_each(|dst, &src| *dst = normalize_label(src, cube));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    fn cube() -> Cube {
        Cube::new([200.0, 200.0, 200.0]).unwrap()
    }

    fn frame_with(color: Array3<f32>, dpt: Array2<f32>, gt3dcrop: Array2<f32>, com_z: f32) -> Frame {
        let gtorig = Array2::zeros(gt3dcrop.raw_dim());
        Frame::new(color, dpt, gtorig, gt3dcrop, [0.0, 0.0, com_z]).unwrap()
    }

    #[test]
    fn test_color_moves_channels_first() {
        let mut color = Array3::zeros((2, 3, 3));
        // pixel (row 1, col 2) = rgb(10, 20, 30)
        color[[1, 2, 0]] = 10.0;
        color[[1, 2, 1]] = 20.0;
        color[[1, 2, 2]] = 30.0;
        let frame = frame_with(color, Array2::zeros((2, 3)), Array2::zeros((1, 3)), 100.0);

        let mut slot = Array3::zeros((3, 2, 3));
        fill_color(slot.view_mut(), &frame, NormalizationMode::ZeroOne);

        assert_eq!(slot[[0, 1, 2]], 10.0 / 256.0);
        assert_eq!(slot[[1, 1, 2]], 20.0 / 256.0);
        assert_eq!(slot[[2, 1, 2]], 30.0 / 256.0);
        assert_eq!(slot[[0, 0, 0]], 0.0);
    }

    #[test]
    fn test_depth_hole_substitution() {
        let dpt = array![[0.0, 450.0], [550.0, 0.0]];
        let frame = frame_with(Array3::zeros((2, 2, 3)), dpt, Array2::zeros((1, 3)), 500.0);

        let mut slot = Array3::zeros((1, 2, 2));
        fill_depth(slot.view_mut(), &frame, cube(), NormalizationMode::Symmetric);

        assert_eq!(slot[[0, 0, 0]], 1.0);
        assert_eq!(slot[[0, 0, 1]], -0.5);
        assert_eq!(slot[[0, 1, 0]], 0.5);
        assert_eq!(slot[[0, 1, 1]], 1.0);
    }

    #[test]
    fn test_labels_clip() {
        let gt = array![[-250.0, 0.0, 50.0], [99.0, 100.0, 1000.0]];
        let frame = frame_with(Array3::zeros((1, 1, 3)), Array2::zeros((1, 1)), gt, 500.0);

        let mut slot = Array2::zeros((2, 3));
        fill_labels(slot.view_mut(), &frame, cube());

        assert_eq!(slot, array![[-1.0, 0.0, 0.5], [0.99, 1.0, 1.0]]);
    }
}
