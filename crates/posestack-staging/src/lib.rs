// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # posestack-staging
//!
//! Turns sequences of hand-pose frames into dense, normalized stacks for a
//! training loop:
//! - [`SequenceRegistry`]: ordered sequences, lookup by name
//! - [`StackBuilder`]: color/depth image stacks and clipped label stacks
//! - [`StackCache`]: retain-or-discard memoization keyed by sequence name
//! - [`Dataset`]: the three owned together, with cache invalidation on
//!   wholesale sequence replacement

pub mod builder;
pub mod cache;
mod dataset;
mod registry;

pub use builder::{StackBuilder, StackShape};
pub use cache::{
    cache_for_policy, CacheStats, DiscardingStackCache, RetainingStackCache, StackCache,
};
pub use dataset::Dataset;
pub use registry::SequenceRegistry;
