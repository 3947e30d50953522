// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Memoization of built stacks, keyed by sequence name.
//!
//! Image stacks live in one namespace per (modality, normalization mode), so a
//! color stack and a depth stack of the same sequence never collide. Label
//! stacks are shared per sequence name: whichever modality was built last
//! owns the entry. The label formula depends only on `gt3Dcrop` and the cube,
//! so the shared entry holds the same values either way.

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashMap;
use ndarray::{Array3, Array4};
use posestack_structures::{CachePolicy, NormalizationMode, StackModality, StackPair};

/// Counters and sizes reported by a [`StackCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub image_entries: usize,
    pub label_entries: usize,
}

/// Storage for built stacks.
pub trait StackCache: Debug + Send {
    fn policy(&self) -> CachePolicy;

    /// Returns the cached pair, or `None` on a miss.
    fn get(&mut self, name: &str, modality: StackModality, mode: NormalizationMode) -> Option<StackPair>;

    /// Stores a freshly built pair. A no-op for caches that do not retain.
    fn put(&mut self, name: &str, modality: StackModality, mode: NormalizationMode, pair: &StackPair);

    /// Drops every image and label stack.
    fn invalidate_all(&mut self);

    fn stats(&self) -> CacheStats;
}

/// Creates the cache implementation for a policy.
pub fn cache_for_policy(policy: CachePolicy) -> Box<dyn StackCache> {
    match policy {
        CachePolicy::Retain => Box::new(RetainingStackCache::new()),
        CachePolicy::Discard => Box::new(DiscardingStackCache::new()),
    }
}

/// Keeps every built stack in memory until invalidated.
#[derive(Debug, Default)]
pub struct RetainingStackCache {
    images: AHashMap<(StackModality, NormalizationMode), AHashMap<String, Arc<Array4<f32>>>>,
    labels: AHashMap<String, Arc<Array3<f32>>>,
    hits: u64,
    misses: u64,
}

impl RetainingStackCache {
    pub fn new() -> RetainingStackCache {
        RetainingStackCache::default()
    }

    fn lookup(&self, name: &str, modality: StackModality, mode: NormalizationMode) -> Option<StackPair> {
        let images = self.images.get(&(modality, mode))?.get(name)?;
        let labels = self.labels.get(name)?;
        Some(StackPair {
            images: Arc::clone(images),
            labels: Arc::clone(labels),
        })
    }
}

impl StackCache for RetainingStackCache {
    fn policy(&self) -> CachePolicy {
        CachePolicy::Retain
    }

    fn get(&mut self, name: &str, modality: StackModality, mode: NormalizationMode) -> Option<StackPair> {
        let found = self.lookup(name, modality, mode);
        if found.is_some() {
            self.hits += 1;
            tracing::debug!("[STACK-CACHE] Hit for {} stack of '{}' ({})", modality, name, mode);
        } else {
            self.misses += 1;
            tracing::debug!("[STACK-CACHE] Miss for {} stack of '{}' ({})", modality, name, mode);
        }
        found
    }

    fn put(&mut self, name: &str, modality: StackModality, mode: NormalizationMode, pair: &StackPair) {
        self.images
            .entry((modality, mode))
            .or_default()
            .insert(name.to_string(), Arc::clone(&pair.images));
        self.labels.insert(name.to_string(), Arc::clone(&pair.labels));
    }

    fn invalidate_all(&mut self) {
        let stats = self.stats();
        self.images.clear();
        self.labels.clear();
        tracing::debug!(
            "[STACK-CACHE] Invalidated {} image and {} label stacks",
            stats.image_entries,
            stats.label_entries
        );
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            image_entries: self.images.values().map(|m| m.len()).sum(),
            label_entries: self.labels.len(),
        }
    }
}

/// Never stores anything; every request is a miss and gets rebuilt.
#[derive(Debug, Default)]
pub struct DiscardingStackCache {
    misses: u64,
}

impl DiscardingStackCache {
    pub fn new() -> DiscardingStackCache {
        DiscardingStackCache::default()
    }
}

impl StackCache for DiscardingStackCache {
    fn policy(&self) -> CachePolicy {
        CachePolicy::Discard
    }

    fn get(&mut self, _name: &str, _modality: StackModality, _mode: NormalizationMode) -> Option<StackPair> {
        self.misses += 1;
        None
    }

    fn put(&mut self, _name: &str, _modality: StackModality, _mode: NormalizationMode, _pair: &StackPair) {}

    fn invalidate_all(&mut self) {}

    fn stats(&self) -> CacheStats {
        CacheStats {
            misses: self.misses,
            ..CacheStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(fill: f32) -> StackPair {
        StackPair::new(Array4::from_elem((1, 1, 2, 2), fill), Array3::from_elem((1, 2, 3), fill))
    }

    #[test]
    fn test_retaining_roundtrip() {
        let mut cache = RetainingStackCache::new();
        assert!(cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).is_none());

        let stored = pair(0.5);
        cache.put("a", StackModality::Color, NormalizationMode::ZeroOne, &stored);
        let hit = cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).unwrap();
        assert!(hit.shares_storage_with(&stored));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.image_entries, 1);
        assert_eq!(stats.label_entries, 1);
    }

    #[test]
    fn test_modalities_do_not_collide() {
        let mut cache = RetainingStackCache::new();
        cache.put("a", StackModality::Color, NormalizationMode::ZeroOne, &pair(1.0));
        assert!(cache.get("a", StackModality::Depth, NormalizationMode::ZeroOne).is_none());

        cache.put("a", StackModality::Depth, NormalizationMode::ZeroOne, &pair(2.0));
        let color = cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).unwrap();
        let depth = cache.get("a", StackModality::Depth, NormalizationMode::ZeroOne).unwrap();
        assert_eq!(color.images[[0, 0, 0, 0]], 1.0);
        assert_eq!(depth.images[[0, 0, 0, 0]], 2.0);
    }

    #[test]
    fn test_modes_do_not_collide() {
        let mut cache = RetainingStackCache::new();
        cache.put("a", StackModality::Depth, NormalizationMode::ZeroOne, &pair(1.0));
        assert!(cache.get("a", StackModality::Depth, NormalizationMode::Symmetric).is_none());
    }

    #[test]
    fn test_labels_last_writer_wins() {
        let mut cache = RetainingStackCache::new();
        cache.put("a", StackModality::Color, NormalizationMode::ZeroOne, &pair(1.0));
        let depth = pair(2.0);
        cache.put("a", StackModality::Depth, NormalizationMode::ZeroOne, &depth);

        let color = cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).unwrap();
        assert!(Arc::ptr_eq(&color.labels, &depth.labels));
        assert_eq!(cache.stats().label_entries, 1);
        assert_eq!(cache.stats().image_entries, 2);
    }

    #[test]
    fn test_invalidate_all() {
        let mut cache = RetainingStackCache::new();
        cache.put("a", StackModality::Color, NormalizationMode::ZeroOne, &pair(1.0));
        cache.put("b", StackModality::Depth, NormalizationMode::Symmetric, &pair(1.0));
        cache.invalidate_all();
        assert!(cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).is_none());
        assert!(cache.get("b", StackModality::Depth, NormalizationMode::Symmetric).is_none());
        assert_eq!(cache.stats().image_entries, 0);
        assert_eq!(cache.stats().label_entries, 0);
    }

    #[test]
    fn test_discarding_never_stores() {
        let mut cache = DiscardingStackCache::new();
        cache.put("a", StackModality::Color, NormalizationMode::ZeroOne, &pair(1.0));
        assert!(cache.get("a", StackModality::Color, NormalizationMode::ZeroOne).is_none());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().image_entries, 0);
    }

    #[test]
    fn test_cache_for_policy() {
        assert_eq!(cache_for_policy(CachePolicy::Retain).policy(), CachePolicy::Retain);
        assert_eq!(cache_for_policy(CachePolicy::Discard).policy(), CachePolicy::Discard);
    }
}
