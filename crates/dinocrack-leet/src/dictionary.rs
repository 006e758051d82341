//! Dictionary trait for word validation.
//!
//! This module defines the [`Dictionary`] trait used by the deleeter to pick
//! between readings of an ambiguous leet symbol (`<` may be `c` or `k`).

use std::collections::{BTreeSet, HashSet};

/// Trait for word validation dictionaries.
///
/// Implementations can back this with embedded word lists, file-based
/// dictionaries, or external spell-checking services.
pub trait Dictionary: Send + Sync {
    /// Check if a word exists in the dictionary.
    ///
    /// Implementations should perform case-insensitive lookups.
    fn contains(&self, word: &str) -> bool;
}

impl Dictionary for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word.to_lowercase().as_str())
    }
}

impl Dictionary for BTreeSet<String> {
    fn contains(&self, word: &str) -> bool {
        BTreeSet::contains(self, word.to_lowercase().as_str())
    }
}
