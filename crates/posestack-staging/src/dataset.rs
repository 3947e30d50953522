// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Dataset facade: sequences, stack cache and builder owned together.

use posestack_config::StagingConfig;
use posestack_structures::{
    CachePolicy, NormalizationMode, Sequence, StackModality, StackPair, StagingResult,
};

use crate::builder::StackBuilder;
use crate::cache::{cache_for_policy, CacheStats, StackCache};
use crate::registry::SequenceRegistry;

/// Serves normalized stacks for the sequences it holds.
///
/// Stack requests for an unknown sequence name return `Ok(None)`. Structural
/// problems with a known sequence (no frames, inconsistent shapes) are errors.
///
/// Not synchronized: every mutating call takes `&mut self`, wrap the dataset
/// in a lock to share it between threads.
///
/// # Example
/// ```
/// use ndarray::{Array2, Array3};
/// use posestack_staging::Dataset;
/// use posestack_structures::{CachePolicy, Cube, Frame, Sequence, SequenceConfig};
///
/// let frame = Frame::new(
///     Array3::from_elem((2, 2, 3), 128.0),
///     Array2::from_elem((2, 2), 500.0),
///     Array2::zeros((4, 3)),
///     Array2::zeros((4, 3)),
///     [0.0, 0.0, 500.0],
/// ).unwrap();
/// let config = SequenceConfig::new(Cube::new([200.0, 200.0, 200.0]).unwrap());
/// let mut dataset = Dataset::new(Some(vec![Sequence::new("train", vec![frame], config)]), CachePolicy::Retain);
///
/// let pair = dataset.depth_stack("train", false).unwrap().unwrap();
/// assert_eq!(pair.images.shape(), &[1, 1, 2, 2]);
/// assert!(dataset.color_stack("missing", true).unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct Dataset {
    registry: SequenceRegistry,
    cache: Box<dyn StackCache>,
    builder: StackBuilder,
    default_normalization: NormalizationMode,
}

impl Dataset {
    pub fn new(sequences: Option<Vec<Sequence>>, policy: CachePolicy) -> Dataset {
        Dataset {
            registry: SequenceRegistry::new(sequences),
            cache: cache_for_policy(policy),
            builder: StackBuilder::default(),
            default_normalization: NormalizationMode::default(),
        }
    }

    pub fn from_config(sequences: Option<Vec<Sequence>>, config: &StagingConfig) -> Dataset {
        Dataset {
            registry: SequenceRegistry::new(sequences),
            cache: cache_for_policy(config.cache_policy),
            builder: StackBuilder::from_config(config),
            default_normalization: config.default_normalization,
        }
    }

    /// Uses a caller-supplied cache implementation.
    pub fn with_cache(sequences: Option<Vec<Sequence>>, cache: Box<dyn StackCache>) -> Dataset {
        Dataset {
            registry: SequenceRegistry::new(sequences),
            cache,
            builder: StackBuilder::default(),
            default_normalization: NormalizationMode::default(),
        }
    }

    pub fn with_builder(mut self, builder: StackBuilder) -> Dataset {
        self.builder = builder;
        self
    }

    //region Sequences

    pub fn sequences(&self) -> &[Sequence] {
        self.registry.all()
    }

    pub fn sequence(&self, name: &str) -> Option<&Sequence> {
        self.registry.find(name)
    }

    pub fn registry(&self) -> &SequenceRegistry {
        &self.registry
    }

    /// Replaces every sequence and drops every cached stack, including stacks
    /// of names that reappear in the new collection.
    pub fn set_sequences(&mut self, sequences: Vec<Sequence>) -> Vec<Sequence> {
        let previous = self.registry.replace_all(sequences);
        self.cache.invalidate_all();
        previous
    }

    //endregion

    //region Stacks

    /// Color stack (N, 3, H, W) and labels for `name`.
    ///
    /// `mode` accepts a [`NormalizationMode`] or a bool (`true` for zero-one).
    pub fn color_stack(
        &mut self,
        name: &str,
        mode: impl Into<NormalizationMode>,
    ) -> StagingResult<Option<StackPair>> {
        self.stack(name, StackModality::Color, mode.into())
    }

    /// Depth stack (N, 1, H, W) and labels for `name`.
    pub fn depth_stack(
        &mut self,
        name: &str,
        mode: impl Into<NormalizationMode>,
    ) -> StagingResult<Option<StackPair>> {
        self.stack(name, StackModality::Depth, mode.into())
    }

    /// Stack for `name` using the configured default normalization.
    pub fn default_stack(&mut self, name: &str, modality: StackModality) -> StagingResult<Option<StackPair>> {
        self.stack(name, modality, self.default_normalization)
    }

    pub fn stack(
        &mut self,
        name: &str,
        modality: StackModality,
        mode: NormalizationMode,
    ) -> StagingResult<Option<StackPair>> {
        let Some(sequence) = self.registry.find(name) else {
            tracing::debug!("[DATASET] No sequence named '{}', returning no {} stack", name, modality);
            return Ok(None);
        };

        if let Some(pair) = self.cache.get(name, modality, mode) {
            return Ok(Some(pair));
        }

        let pair = self.builder.build(sequence, modality, mode)?;
        self.cache.put(name, modality, mode, &pair);
        Ok(Some(pair))
    }

    //endregion

    pub fn cache_policy(&self) -> CachePolicy {
        self.cache.policy()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn default_normalization(&self) -> NormalizationMode {
        self.default_normalization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};
    use posestack_structures::{Cube, Frame, SequenceConfig, StagingError};

    fn sequence(name: &str, frames: usize, value: f32) -> Sequence {
        let frames = (0..frames)
            .map(|_| {
                Frame::new(
                    Array3::from_elem((3, 4, 3), value),
                    Array2::from_elem((3, 4), 500.0 + value),
                    Array2::from_elem((5, 3), value),
                    Array2::from_elem((5, 3), value),
                    [0.0, 0.0, 500.0],
                )
                .unwrap()
            })
            .collect();
        Sequence::new(name, frames, SequenceConfig::new(Cube::new([200.0, 200.0, 200.0]).unwrap()))
    }

    #[test]
    fn test_retain_returns_same_storage() {
        let mut dataset = Dataset::new(Some(vec![sequence("a", 2, 10.0)]), CachePolicy::Retain);
        let first = dataset.color_stack("a", true).unwrap().unwrap();
        let second = dataset.color_stack("a", true).unwrap().unwrap();
        assert!(first.shares_storage_with(&second));
        assert_eq!(dataset.cache_stats().hits, 1);
    }

    #[test]
    fn test_discard_recomputes_equal_values() {
        let mut dataset = Dataset::new(Some(vec![sequence("a", 2, 10.0)]), CachePolicy::Discard);
        let first = dataset.depth_stack("a", false).unwrap().unwrap();
        let second = dataset.depth_stack("a", false).unwrap().unwrap();
        assert!(!first.shares_storage_with(&second));
        assert_eq!(first, second);
        assert_eq!(dataset.cache_stats().image_entries, 0);
    }

    #[test]
    fn test_unknown_name_is_none() {
        let mut dataset = Dataset::new(None, CachePolicy::Retain);
        assert!(dataset.sequence("nonexistent").is_none());
        assert!(dataset.color_stack("nonexistent", true).unwrap().is_none());
        assert!(dataset.depth_stack("nonexistent", false).unwrap().is_none());
    }

    #[test]
    fn test_empty_sequence_is_error() {
        let mut dataset = Dataset::new(Some(vec![sequence("empty", 0, 0.0)]), CachePolicy::Retain);
        let result = dataset.color_stack("empty", true);
        assert!(matches!(result, Err(StagingError::EmptySequence { .. })));
        assert_eq!(dataset.cache_stats().image_entries, 0);
    }

    #[test]
    fn test_set_sequences_invalidates_reused_name() {
        let mut dataset = Dataset::new(Some(vec![sequence("a", 1, 10.0)]), CachePolicy::Retain);
        let old = dataset.color_stack("a", true).unwrap().unwrap();

        dataset.set_sequences(vec![sequence("a", 1, 20.0)]);
        assert_eq!(dataset.cache_stats().image_entries, 0);
        assert_eq!(dataset.cache_stats().label_entries, 0);

        let new = dataset.color_stack("a", true).unwrap().unwrap();
        assert!(!old.shares_storage_with(&new));
        assert_eq!(new.images[[0, 0, 0, 0]], 20.0 / 256.0);
    }

    #[test]
    fn test_set_sequences_invalidates_every_modality_and_mode() {
        let mut dataset = Dataset::new(Some(vec![sequence("a", 1, 10.0)]), CachePolicy::Retain);
        let modes = [NormalizationMode::ZeroOne, NormalizationMode::Symmetric];
        let modalities = [StackModality::Color, StackModality::Depth];
        for modality in modalities {
            for mode in modes {
                dataset.stack("a", modality, mode).unwrap().unwrap();
            }
        }
        assert_eq!(dataset.cache_stats().image_entries, 4);

        dataset.set_sequences(vec![sequence("a", 1, 30.0)]);
        for modality in modalities {
            for mode in modes {
                let fresh = dataset.stack("a", modality, mode).unwrap().unwrap();
                let rebuilt = StackBuilder::default()
                    .build(dataset.sequence("a").unwrap(), modality, mode)
                    .unwrap();
                assert_eq!(fresh, rebuilt);
            }
        }
        assert_eq!(dataset.cache_stats().hits, 0);
    }

    #[test]
    fn test_from_config_uses_policy_and_default_mode() {
        let config = StagingConfig {
            cache_policy: CachePolicy::Discard,
            default_normalization: NormalizationMode::ZeroOne,
            ..StagingConfig::default()
        };
        let mut dataset = Dataset::from_config(Some(vec![sequence("a", 1, 64.0)]), &config);
        assert_eq!(dataset.cache_policy(), CachePolicy::Discard);
        let pair = dataset.default_stack("a", StackModality::Color).unwrap().unwrap();
        assert_eq!(pair.images[[0, 0, 0, 0]], 0.25);
    }
}
