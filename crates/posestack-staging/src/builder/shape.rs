// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stack shape inference from frame 0 and cross-frame consistency checks.

use posestack_structures::{Frame, Sequence, StackModality, StagingError, StagingResult};

/// Shapes of the two tensors of a stack pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackShape {
    pub frames: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    pub joints: usize,
    pub dimensions: usize,
}

impl StackShape {
    /// Infers the shape from frame 0 and checks every other frame against it.
    ///
    /// Nothing is allocated before this succeeds, so a bad frame never leaves a
    /// partially filled stack behind.
    ///
    /// # Errors
    /// - [`StagingError::EmptySequence`] if the sequence has no frames
    /// - [`StagingError::ShapeMismatch`] for the first frame that disagrees with frame 0
    pub fn infer(sequence: &Sequence, modality: StackModality) -> StagingResult<StackShape> {
        let first = sequence
            .frames()
            .first()
            .ok_or_else(|| StagingError::EmptySequence {
                name: sequence.name().to_string(),
            })?;

        let (height, width) = image_resolution(first, modality);
        let (joints, dimensions) = first.joint_dimensions();

        for (index, frame) in sequence.frames().iter().enumerate().skip(1) {
            let actual = image_resolution(frame, modality);
            if actual != (height, width) {
                return Err(StagingError::ShapeMismatch {
                    frame: index,
                    field: image_field(modality),
                    expected: vec![height, width],
                    actual: vec![actual.0, actual.1],
                });
            }
            // gt3Dcrop is tied to gtorig by Frame::new, checking one covers both
            let actual = frame.joint_dimensions();
            if actual != (joints, dimensions) {
                return Err(StagingError::ShapeMismatch {
                    frame: index,
                    field: "gtorig",
                    expected: vec![joints, dimensions],
                    actual: vec![actual.0, actual.1],
                });
            }
        }

        Ok(StackShape {
            frames: sequence.len(),
            channels: modality.channels(),
            height,
            width,
            joints,
            dimensions,
        })
    }

    /// (N, C, H, W)
    pub fn image_dims(&self) -> (usize, usize, usize, usize) {
        (self.frames, self.channels, self.height, self.width)
    }

    /// (N, J, D)
    pub fn label_dims(&self) -> (usize, usize, usize) {
        (self.frames, self.joints, self.dimensions)
    }
}

fn image_resolution(frame: &Frame, modality: StackModality) -> (usize, usize) {
    match modality {
        StackModality::Color => frame.color_resolution(),
        StackModality::Depth => frame.depth_resolution(),
    }
}

fn image_field(modality: StackModality) -> &'static str {
    match modality {
        StackModality::Color => "color",
        StackModality::Depth => "dpt",
    }
}
