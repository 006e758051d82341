//! Recovered adjectives and nouns.

use std::collections::BTreeSet;

/// Two sorted sets of lowercase words.
///
/// Owned by the caller: the analyzer takes it by `&mut`, the generator by `&`.
/// It only grows unless [`clear`](Vocabulary::clear) is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    adjectives: BTreeSet<String>,
    nouns: BTreeSet<String>,
}

/// Word counts for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocabularyStats {
    pub adjectives: usize,
    pub nouns: usize,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<A, N>(adjectives: A, nouns: N) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let mut vocabulary = Self::new();
        for adjective in adjectives {
            vocabulary.insert_adjective(adjective.as_ref());
        }
        for noun in nouns {
            vocabulary.insert_noun(noun.as_ref());
        }
        vocabulary
    }

    pub(crate) fn from_sets(adjectives: BTreeSet<String>, nouns: BTreeSet<String>) -> Self {
        Self { adjectives, nouns }
    }

    /// Returns `true` if the word was new.
    pub fn insert_adjective(&mut self, word: &str) -> bool {
        self.adjectives.insert(word.to_lowercase())
    }

    /// Returns `true` if the word was new.
    pub fn insert_noun(&mut self, word: &str) -> bool {
        self.nouns.insert(word.to_lowercase())
    }

    pub fn adjectives(&self) -> &BTreeSet<String> {
        &self.adjectives
    }

    pub fn nouns(&self) -> &BTreeSet<String> {
        &self.nouns
    }

    pub fn contains_adjective(&self, word: &str) -> bool {
        self.adjectives.contains(&word.to_lowercase())
    }

    pub fn contains_noun(&self, word: &str) -> bool {
        self.nouns.contains(&word.to_lowercase())
    }

    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats {
            adjectives: self.adjectives.len(),
            nouns: self.nouns.len(),
        }
    }

    /// Generation needs at least one adjective and one noun.
    pub fn is_usable(&self) -> bool {
        !self.adjectives.is_empty() && !self.nouns.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.adjectives.is_empty() && self.nouns.is_empty()
    }

    /// Add every word of `other`.
    pub fn merge(&mut self, other: &Vocabulary) {
        self.adjectives.extend(other.adjectives.iter().cloned());
        self.nouns.extend(other.nouns.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.adjectives.clear();
        self.nouns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.insert_adjective("wild"));
        assert!(!vocab.insert_adjective("Wild"));
        assert!(vocab.insert_noun("lion"));
        assert_eq!(vocab.stats(), VocabularyStats { adjectives: 1, nouns: 1 });
        assert!(vocab.contains_noun("LION"));
    }

    #[test]
    fn test_usable_needs_both_sides() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.is_empty());
        vocab.insert_adjective("wild");
        assert!(!vocab.is_usable());
        vocab.insert_noun("lion");
        assert!(vocab.is_usable());
    }

    #[test]
    fn test_merge_and_clear() {
        let mut vocab = Vocabulary::from_words(["wild"], ["lion"]);
        vocab.merge(&Vocabulary::from_words(["brave", "wild"], ["eagle"]));
        assert_eq!(
            vocab.adjectives().iter().collect::<Vec<_>>(),
            vec!["brave", "wild"]
        );
        assert_eq!(vocab.stats().nouns, 2);

        vocab.clear();
        assert!(vocab.is_empty());
    }
}
