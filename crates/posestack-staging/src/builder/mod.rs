// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stack building: turns the frames of one sequence into an (N, C, H, W)
//! image stack and an (N, J, D) label stack.

mod fill;
pub mod normalization;
mod shape;

use std::time::Instant;

use ndarray::{Array3, Array4, ArrayViewMut2, ArrayViewMut3, Axis};
use posestack_config::StagingConfig;
use posestack_structures::{Frame, NormalizationMode, Sequence, StackModality, StackPair, StagingResult};
use rayon::prelude::*;

pub use shape::StackShape;

/// Builds stack pairs from sequences. Holds no data, only the fill strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackBuilder {
    parallel: bool,
    parallel_min_frames: usize,
}

impl Default for StackBuilder {
    fn default() -> Self {
        StackBuilder::sequential()
    }
}

impl StackBuilder {
    /// Fills frames one after another on the calling thread.
    pub fn sequential() -> StackBuilder {
        StackBuilder {
            parallel: false,
            parallel_min_frames: usize::MAX,
        }
    }

    /// Fills frames on the rayon pool once a sequence has at least
    /// `min_frames` frames. Output is identical to the sequential fill.
    pub fn parallel(min_frames: usize) -> StackBuilder {
        StackBuilder {
            parallel: true,
            parallel_min_frames: min_frames.max(1),
        }
    }

    pub fn from_config(config: &StagingConfig) -> StackBuilder {
        if config.parallel_build {
            StackBuilder::parallel(config.parallel_min_frames)
        } else {
            StackBuilder::sequential()
        }
    }

    /// Color image stack (N, 3, H, W) plus labels.
    ///
    /// # Errors
    /// [`posestack_structures::StagingError::EmptySequence`] or
    /// [`posestack_structures::StagingError::ShapeMismatch`], see [`StackShape::infer`].
    pub fn build_color_stack(
        &self,
        sequence: &Sequence,
        mode: impl Into<NormalizationMode>,
    ) -> StagingResult<StackPair> {
        self.build(sequence, StackModality::Color, mode.into())
    }

    /// Depth image stack (N, 1, H, W) plus labels. Depth holes become the far
    /// plane of each frame's crop volume before scaling.
    ///
    /// # Errors
    /// Same as [`StackBuilder::build_color_stack`].
    pub fn build_depth_stack(
        &self,
        sequence: &Sequence,
        mode: impl Into<NormalizationMode>,
    ) -> StagingResult<StackPair> {
        self.build(sequence, StackModality::Depth, mode.into())
    }

    pub fn build(
        &self,
        sequence: &Sequence,
        modality: StackModality,
        mode: NormalizationMode,
    ) -> StagingResult<StackPair> {
        let started = Instant::now();
        let shape = StackShape::infer(sequence, modality)?;

        let mut images = Array4::<f32>::zeros(shape.image_dims());
        let mut labels = Array3::<f32>::zeros(shape.label_dims());
        let cube = sequence.cube();

        match modality {
            StackModality::Color => self.fill_frames(&mut images, &mut labels, sequence.frames(), |slot, label_slot, frame| {
                fill::fill_color(slot, frame, mode);
                fill::fill_labels(label_slot, frame, cube);
            }),
            StackModality::Depth => self.fill_frames(&mut images, &mut labels, sequence.frames(), |slot, label_slot, frame| {
                fill::fill_depth(slot, frame, cube, mode);
                fill::fill_labels(label_slot, frame, cube);
            }),
        }

        tracing::debug!(
            "[STACK-BUILD] Built {} stack for '{}' ({:?}, {}) in {:?}",
            modality,
            sequence.name(),
            shape.image_dims(),
            mode,
            started.elapsed()
        );
        Ok(StackPair::new(images, labels))
    }

    fn fill_frames<F>(&self, images: &mut Array4<f32>, labels: &mut Array3<f32>, frames: &[Frame], fill_frame: F)
    where
        F: Fn(ArrayViewMut3<'_, f32>, ArrayViewMut2<'_, f32>, &Frame) + Send + Sync,
    {
        if self.parallel && frames.len() >= self.parallel_min_frames {
            images
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .zip(labels.axis_iter_mut(Axis(0)).into_par_iter())
                .zip(frames.par_iter())
                .for_each(|((slot, label_slot), frame)| fill_frame(slot, label_slot, frame));
        } else {
            images
                .axis_iter_mut(Axis(0))
                .zip(labels.axis_iter_mut(Axis(0)))
                .zip(frames)
                .for_each(|((slot, label_slot), frame)| fill_frame(slot, label_slot, frame));
        }
    }
}
