// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Derived stack tensors and the enums that select how they are built and kept.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use ndarray::{Array3, Array4};
use serde::{Deserialize, Serialize};

/// Which image field of the frames a stack aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackModality {
    Color,
    Depth,
}

impl StackModality {
    /// Channel count of the image stack (axis 1).
    pub fn channels(&self) -> usize {
        match self {
            StackModality::Color => crate::frame::COLOR_CHANNELS,
            StackModality::Depth => 1,
        }
    }
}

impl Display for StackModality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StackModality::Color => write!(f, "color"),
            StackModality::Depth => write!(f, "depth"),
        }
    }
}

/// Image intensity and depth scaling policy.
///
/// - `ZeroOne`: color `c / 256`, depth mapped from the crop range onto [0, 1]
/// - `Symmetric`: color `(c - 128) / 128`, depth mapped onto [-1, 1] around `com`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    ZeroOne,
    #[default]
    Symmetric,
}

impl From<bool> for NormalizationMode {
    /// `true` selects zero-one normalization, matching the `normZeroOne` flag.
    fn from(normalize_zero_one: bool) -> Self {
        if normalize_zero_one {
            NormalizationMode::ZeroOne
        } else {
            NormalizationMode::Symmetric
        }
    }
}

impl Display for NormalizationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationMode::ZeroOne => write!(f, "zero_one"),
            NormalizationMode::Symmetric => write!(f, "symmetric"),
        }
    }
}

/// Whether built stacks are kept in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    #[default]
    Retain,
    Discard,
}

impl From<bool> for CachePolicy {
    /// `true` retains stacks, matching the `localCache` flag.
    fn from(local_cache: bool) -> Self {
        if local_cache {
            CachePolicy::Retain
        } else {
            CachePolicy::Discard
        }
    }
}

/// Image stack (N, C, H, W) and label stack (N, J, D) for one sequence.
///
/// Both tensors are shared; cloning a pair never copies array data.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPair {
    pub images: Arc<Array4<f32>>,
    pub labels: Arc<Array3<f32>>,
}

impl StackPair {
    pub fn new(images: Array4<f32>, labels: Array3<f32>) -> StackPair {
        StackPair {
            images: Arc::new(images),
            labels: Arc::new(labels),
        }
    }

    /// Number of frames (axis 0).
    pub fn len(&self) -> usize {
        self.images.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if both tensors are the same allocations as `other`'s.
    pub fn shares_storage_with(&self, other: &StackPair) -> bool {
        Arc::ptr_eq(&self.images, &other.images) && Arc::ptr_eq(&self.labels, &other.labels)
    }
}
