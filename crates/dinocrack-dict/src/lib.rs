//! Word-list dictionary for leet disambiguation.
//!
//! The deleeter consults a [`Dictionary`] only when a symbol reads back to
//! more than one letter (`<` → `c` or `k`). This crate provides one backed by
//! a plain word list.
//!
//! # Loading Modes
//!
//! - **Embedded**: the compiled-in list of common words with [`WordListDictionary::embedded()`]
//! - **File-based**: any word list on disk with [`WordListDictionary::from_file()`]

use std::collections::HashSet;
use std::io;
use std::path::Path;

use dinocrack_leet::Dictionary;

/// A dictionary backed by a newline-delimited word list.
#[derive(Debug, Clone, Default)]
pub struct WordListDictionary {
    words: HashSet<String>,
}

impl WordListDictionary {
    /// Load the embedded list of common adjectives and nouns.
    pub fn embedded() -> Self {
        Self::from_str(include_str!("../data/wordlist.txt"))
    }

    /// Load dictionary from a file path.
    ///
    /// Any one-word-per-line list works, e.g. `/usr/share/dict/words`.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content))
    }

    /// Load dictionary from string content.
    ///
    /// Each line should contain one word. Empty lines and lines starting
    /// with '#' are ignored.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.to_lowercase())
            .collect();
        Self { words }
    }

    /// Merge another word list into this one.
    pub fn extend_from_str(&mut self, content: &str) {
        self.words.extend(Self::from_str(content).words);
    }

    /// Return the number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordListDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use dinocrack_leet::{Deleeter, LeetCodec, Resolution};

    #[test]
    fn test_embedded_dictionary_loads() {
        let dict = WordListDictionary::embedded();
        assert!(dict.len() > 500, "Expected >500 words, got {}", dict.len());
    }

    #[test]
    fn test_contains_common_words() {
        let dict = WordListDictionary::embedded();

        assert!(dict.contains("lion"));
        assert!(dict.contains("brave"));
        assert!(dict.contains("duck"));
        assert!(dict.contains("kite"));
        assert!(dict.contains("clock"));
    }

    #[test]
    fn test_case_insensitive() {
        let dict = WordListDictionary::embedded();

        assert!(dict.contains("Tiger"));
        assert!(dict.contains("TIGER"));
        assert!(dict.contains("tiger"));
    }

    #[test]
    fn test_does_not_contain_gibberish() {
        let dict = WordListDictionary::embedded();

        assert!(!dict.contains("asdfghjkl"));
        assert!(!dict.contains("duc"));
        assert!(!dict.contains("ducc"));
    }

    #[test]
    fn test_from_str() {
        let content = "hello\nworld\n# comment\n\n  test  ";
        let dict = WordListDictionary::from_str(content);

        assert_eq!(dict.len(), 3);
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(dict.contains("test"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Kayak\ncanoe").unwrap();

        let mut dict = WordListDictionary::from_file(file.path()).unwrap();
        assert!(dict.contains("kayak"));
        assert_eq!(dict.len(), 2);

        dict.extend_from_str("raft\ncanoe");
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_settles_ambiguous_leet() {
        let codec = LeetCodec::dinopass();
        let dict = WordListDictionary::embedded();
        let deleeter = Deleeter::new(&codec).with_dictionary(&dict);

        let out = deleeter.deleet("<ite");
        assert_eq!(out.word, "kite");
        assert_eq!(out.resolution, Resolution::Dictionary);

        assert_eq!(deleeter.deleet("Du<k").word, "duck");
        assert_eq!(deleeter.deleet("<rab").word, "crab");
    }
}
