// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ordered collection of named sequences.

use ahash::AHashSet;
use posestack_structures::Sequence;

/// Holds sequences in the order the producer supplied them.
///
/// Lookup is a linear scan by name and a miss is `None`, never an error. If
/// two sequences share a name, the first one wins.
///
/// The registry owns no derived data. Wholesale replacement goes through
/// [`crate::Dataset::set_sequences`], which also invalidates the stack cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceRegistry {
    sequences: Vec<Sequence>,
}

impl SequenceRegistry {
    /// A missing initial collection is treated as empty.
    pub fn new(sequences: Option<Vec<Sequence>>) -> SequenceRegistry {
        let sequences = sequences.unwrap_or_default();
        warn_on_duplicate_names(&sequences);
        SequenceRegistry { sequences }
    }

    /// Replaces the whole collection and returns the previous one.
    ///
    /// Crate-internal so a replacement can never bypass cache invalidation,
    /// see [`crate::Dataset::set_sequences`].
    pub(crate) fn replace_all(&mut self, sequences: Vec<Sequence>) -> Vec<Sequence> {
        warn_on_duplicate_names(&sequences);
        tracing::info!(
            "[SEQ-REGISTRY] Replacing {} sequences with {}",
            self.sequences.len(),
            sequences.len()
        );
        std::mem::replace(&mut self.sequences, sequences)
    }

    pub fn find(&self, name: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|seq| seq.name() == name)
    }

    pub fn all(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(|seq| seq.name())
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

fn warn_on_duplicate_names(sequences: &[Sequence]) {
    let mut seen = AHashSet::with_capacity(sequences.len());
    for seq in sequences {
        if !seen.insert(seq.name()) {
            tracing::warn!(
                "[SEQ-REGISTRY] Duplicate sequence name '{}', lookups will return the first one",
                seq.name()
            );
        }
    }
}
