//! Reading leet fragments back into plain lowercase words.
//!
//! Every symbol known to the reverse map is replaced by each of its candidate
//! letters, building the cross product of readings. Leftover non-letters are
//! stripped. When an ambiguous symbol took part, the dictionary picks the
//! reading; otherwise, or when nothing matches, the first reading in sorted
//! order wins.

use std::collections::BTreeSet;

use crate::codec::LeetCodec;
use crate::dictionary::Dictionary;

/// Upper bound on readings kept while expanding ambiguous symbols.
pub const DEFAULT_CANDIDATE_CAP: usize = 256;

/// How a deleeted word was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// No ambiguous symbol was involved.
    Direct,
    /// An ambiguous symbol was settled by a dictionary hit.
    Dictionary,
    /// Ambiguous, but no dictionary (or no hit): first reading taken.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleeted {
    pub word: String,
    pub resolution: Resolution,
}

/// Reverse leet conversion with optional dictionary disambiguation.
pub struct Deleeter<'a> {
    codec: &'a LeetCodec,
    dictionary: Option<&'a dyn Dictionary>,
    candidate_cap: usize,
}

impl<'a> Deleeter<'a> {
    pub fn new(codec: &'a LeetCodec) -> Self {
        Self {
            codec,
            dictionary: None,
            candidate_cap: DEFAULT_CANDIDATE_CAP,
        }
    }

    pub fn with_dictionary(mut self, dictionary: &'a dyn Dictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap.max(1);
        self
    }

    /// Best guess at the plain word behind `fragment`.
    ///
    /// ```
    /// use dinocrack_leet::{Deleeter, LeetCodec, Resolution};
    ///
    /// let codec = LeetCodec::dinopass();
    /// let deleeted = Deleeter::new(&codec).deleet("L!on");
    /// assert_eq!(deleeted.word, "lion");
    /// assert_eq!(deleeted.resolution, Resolution::Direct);
    /// ```
    pub fn deleet(&self, fragment: &str) -> Deleeted {
        let mut candidates = BTreeSet::from([fragment.to_lowercase()]);
        let mut ambiguous = false;

        for (symbol, lookup) in self.codec.reverse_entries() {
            if !candidates.iter().any(|c| c.contains(symbol)) {
                continue;
            }
            ambiguous |= lookup.is_ambiguous();

            let mut expanded = BTreeSet::new();
            for candidate in &candidates {
                if candidate.contains(symbol) {
                    for letter in lookup.letters() {
                        expanded.insert(candidate.replace(symbol, &letter.to_string()));
                    }
                } else {
                    expanded.insert(candidate.clone());
                }
            }

            if expanded.len() > self.candidate_cap {
                tracing::debug!(
                    fragment,
                    readings = expanded.len(),
                    cap = self.candidate_cap,
                    "deleet readings capped"
                );
                while expanded.len() > self.candidate_cap {
                    expanded.pop_last();
                }
            }
            candidates = expanded;
        }

        let readings: BTreeSet<String> = candidates
            .into_iter()
            .map(|c| c.chars().filter(|ch| ch.is_ascii_lowercase()).collect())
            .collect();

        if ambiguous {
            if let Some(dictionary) = self.dictionary {
                if let Some(hit) = readings.iter().find(|r| dictionary.contains(r)) {
                    return Deleeted {
                        word: hit.clone(),
                        resolution: Resolution::Dictionary,
                    };
                }
            }
        }

        let resolution = if ambiguous {
            Resolution::Fallback
        } else {
            Resolution::Direct
        };
        let word = readings
            .into_iter()
            .next()
            .unwrap_or_else(|| fragment.to_string());
        Deleeted { word, resolution }
    }
}
