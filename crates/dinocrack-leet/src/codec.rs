//! Bidirectional leet mapping.
//!
//! The forward direction maps a lowercase letter to one or more substitute
//! symbols and drives variant generation. The reverse direction is derived by
//! inverting it, so a single symbol may point back at several letters. Those
//! lookups come back as [`ReverseLookup::Ambiguous`] and are settled by the
//! [`Deleeter`](crate::Deleeter) with a dictionary.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Substitution table observed in the target generator's output.
const DINOPASS_TABLE: &[(char, &[char])] = &[
    ('a', &['@']),
    ('c', &['(', '<']),
    ('k', &['<']),
    ('e', &['3']),
    ('t', &['+']),
    ('i', &['!']),
    ('d', &[')', '>']),
    ('s', &['$']),
    ('f', &['=']),
    ('j', &[']']),
    ('l', &['[']),
];

/// Symbols that are only ever read back, never produced.
const DINOPASS_REVERSE_ONLY: &[(char, char)] = &[('2', 'z')];

/// Errors raised while building a custom [`LeetCodec`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeetError {
    #[error("leet mapping key must be a lowercase ASCII letter, got {0:?}")]
    InvalidLetter(char),

    #[error("substitute for '{letter}' must not be alphabetic, got {symbol:?}")]
    AlphabeticSubstitute { letter: char, symbol: char },
}

/// Casing rule applied to a word depending on its position in a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordRole {
    /// Leading word, always lowercase.
    Adjective,
    /// Trailing word, first letter capitalised when it is alphabetic.
    Noun,
}

impl WordRole {
    pub fn apply_case(self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self {
            WordRole::Adjective => lower,
            WordRole::Noun => capitalize(&lower),
        }
    }
}

/// Uppercase the first character if it is an ASCII letter.
///
/// A leading leet symbol (`]ade`) is left alone.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        _ => word.to_string(),
    }
}

/// Result of reading a symbol back to its source letter(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseLookup {
    Unambiguous(char),
    /// Several letters share this symbol; sorted, at least two entries.
    Ambiguous(Vec<char>),
}

impl ReverseLookup {
    pub fn letters(&self) -> &[char] {
        match self {
            ReverseLookup::Unambiguous(letter) => std::slice::from_ref(letter),
            ReverseLookup::Ambiguous(letters) => letters,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ReverseLookup::Ambiguous(_))
    }
}

/// Letter ↔ symbol mapping with both directions precomputed.
#[derive(Debug, Clone)]
pub struct LeetCodec {
    forward: BTreeMap<char, Vec<char>>,
    reverse: BTreeMap<char, ReverseLookup>,
    numeric: BTreeSet<char>,
}

impl Default for LeetCodec {
    fn default() -> Self {
        Self::dinopass()
    }
}

impl LeetCodec {
    /// The built-in table for the adjective+noun+digits generator.
    pub fn dinopass() -> Self {
        let forward = DINOPASS_TABLE
            .iter()
            .map(|(letter, symbols)| (*letter, symbols.to_vec()))
            .collect();
        Self::from_parts(forward, DINOPASS_REVERSE_ONLY)
    }

    pub fn builder() -> LeetCodecBuilder {
        LeetCodecBuilder::new()
    }

    fn from_parts(forward: BTreeMap<char, Vec<char>>, reverse_only: &[(char, char)]) -> Self {
        let mut inverted: BTreeMap<char, Vec<char>> = BTreeMap::new();
        let pairs = forward
            .iter()
            .flat_map(|(letter, symbols)| symbols.iter().map(move |symbol| (*symbol, *letter)))
            .chain(reverse_only.iter().copied());
        for (symbol, letter) in pairs {
            let letters = inverted.entry(symbol).or_default();
            if !letters.contains(&letter) {
                letters.push(letter);
            }
        }

        let reverse = inverted
            .into_iter()
            .map(|(symbol, mut letters)| {
                letters.sort_unstable();
                let lookup = if letters.len() == 1 {
                    ReverseLookup::Unambiguous(letters[0])
                } else {
                    ReverseLookup::Ambiguous(letters)
                };
                (symbol, lookup)
            })
            .collect();

        let numeric = forward
            .values()
            .flatten()
            .copied()
            .filter(|c| c.is_ascii_digit())
            .collect();

        Self {
            forward,
            reverse,
            numeric,
        }
    }

    /// Substitutes for `letter`, in table order. Empty when unmapped.
    pub fn substitutes_for(&self, letter: char) -> &[char] {
        self.forward
            .get(&letter.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn letters_for(&self, symbol: char) -> Option<&ReverseLookup> {
        self.reverse.get(&symbol)
    }

    /// Every reverse entry, ordered by symbol.
    pub fn reverse_entries(&self) -> impl Iterator<Item = (char, &ReverseLookup)> {
        self.reverse.iter().map(|(symbol, lookup)| (*symbol, lookup))
    }

    /// Digits always count, mapped or not.
    pub fn is_numeric_leet(&self, c: char) -> bool {
        c.is_ascii_digit() || self.numeric.contains(&c)
    }

    pub fn is_symbol_leet(&self, c: char) -> bool {
        !c.is_ascii_alphabetic() && !self.is_numeric_leet(c)
    }

    /// All variants of `word` carrying exactly one substitution.
    ///
    /// For `jade` this yields `]ade`, `j@de`, `ja)e`, `ja>e` and `jad3`,
    /// never a variant with two substituted positions.
    pub fn single_substitutions(&self, word: &str, role: WordRole) -> BTreeSet<String> {
        let chars: Vec<char> = word.to_lowercase().chars().collect();
        let mut variants = BTreeSet::new();
        for (i, ch) in chars.iter().enumerate() {
            for &symbol in self.substitutes_for(*ch) {
                let mut variant = chars.clone();
                variant[i] = symbol;
                let variant: String = variant.into_iter().collect();
                variants.insert(role.apply_case(&variant));
            }
        }
        variants
    }

    /// The base form plus every single-substitution variant.
    pub fn leet_variants(&self, word: &str, role: WordRole) -> BTreeSet<String> {
        let mut variants = self.single_substitutions(word, role);
        variants.insert(role.apply_case(word));
        variants
    }
}

/// Builder for codecs other than [`LeetCodec::dinopass`].
#[derive(Debug, Default, Clone)]
pub struct LeetCodecBuilder {
    forward: BTreeMap<char, Vec<char>>,
    reverse_only: Vec<(char, char)>,
}

impl LeetCodecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add substitutes for `letter`. Repeated symbols are ignored.
    pub fn map(mut self, letter: char, symbols: &[char]) -> Self {
        let entry = self.forward.entry(letter).or_default();
        for &symbol in symbols {
            if !entry.contains(&symbol) {
                entry.push(symbol);
            }
        }
        self
    }

    /// Register a symbol that deleets to `letter` but is never generated.
    pub fn reverse_only(mut self, symbol: char, letter: char) -> Self {
        self.reverse_only.push((symbol, letter));
        self
    }

    pub fn build(self) -> Result<LeetCodec, LeetError> {
        for (&letter, symbols) in &self.forward {
            if !letter.is_ascii_lowercase() {
                return Err(LeetError::InvalidLetter(letter));
            }
            if let Some(&symbol) = symbols.iter().find(|s| s.is_alphabetic()) {
                return Err(LeetError::AlphabeticSubstitute { letter, symbol });
            }
        }
        for &(symbol, letter) in &self.reverse_only {
            if !letter.is_ascii_lowercase() {
                return Err(LeetError::InvalidLetter(letter));
            }
            if symbol.is_alphabetic() {
                return Err(LeetError::AlphabeticSubstitute { letter, symbol });
            }
        }
        Ok(LeetCodec::from_parts(self.forward, &self.reverse_only))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jade_single_substitutions() {
        let codec = LeetCodec::dinopass();
        let variants = codec.leet_variants("jade", WordRole::Adjective);

        for expected in ["jade", "]ade", "j@de", "ja)e", "ja>e", "jad3"] {
            assert!(variants.contains(expected), "missing {expected}: {variants:?}");
        }
        assert!(!variants.contains("]a]e"));
        assert!(!variants.contains("]ad3"));
        assert!(!variants.contains("ja)3"));
        assert!(!variants.contains("j@d3"));
        assert_eq!(variants.len(), 6);
    }

    #[test]
    fn test_noun_casing() {
        let codec = LeetCodec::dinopass();
        let variants = codec.leet_variants("lion", WordRole::Noun);
        assert!(variants.contains("Lion"));
        assert!(variants.contains("L!on"));
        assert!(!variants.contains("L!0n"));
        // 'l' is mapped, so the leading letter itself can be replaced
        assert!(variants.contains("[ion"));
    }

    #[test]
    fn test_leading_symbol_keeps_position() {
        let codec = LeetCodec::dinopass();
        let variants = codec.single_substitutions("jade", WordRole::Noun);
        assert!(variants.contains("]ade"));
        assert!(variants.contains("Jad3"));
    }

    #[test]
    fn test_unmapped_word_has_no_leet() {
        let codec = LeetCodec::dinopass();
        assert!(codec.single_substitutions("boy", WordRole::Adjective).is_empty());
        assert_eq!(codec.substitutes_for('b'), &[] as &[char]);
    }

    #[test]
    fn test_forward_order() {
        let codec = LeetCodec::dinopass();
        assert_eq!(codec.substitutes_for('c'), &['(', '<']);
        assert_eq!(codec.substitutes_for('D'), &[')', '>']);
    }

    #[test]
    fn test_reverse_lookup() {
        let codec = LeetCodec::dinopass();
        assert_eq!(
            codec.letters_for('<'),
            Some(&ReverseLookup::Ambiguous(vec!['c', 'k']))
        );
        assert_eq!(codec.letters_for('@'), Some(&ReverseLookup::Unambiguous('a')));
        assert_eq!(codec.letters_for('2'), Some(&ReverseLookup::Unambiguous('z')));
        assert_eq!(codec.letters_for('#'), None);
    }

    #[test]
    fn test_numeric_classification() {
        let codec = LeetCodec::dinopass();
        assert!(codec.is_numeric_leet('3'));
        // Not in the table, still numeric
        assert!(codec.is_numeric_leet('7'));
        assert!(codec.is_symbol_leet('!'));
        assert!(codec.is_symbol_leet('#'));
        assert!(!codec.is_symbol_leet('a'));
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            LeetCodec::builder().map('A', &['4']).build().unwrap_err(),
            LeetError::InvalidLetter('A')
        );
        assert_eq!(
            LeetCodec::builder().map('o', &['0', 'q']).build().unwrap_err(),
            LeetError::AlphabeticSubstitute {
                letter: 'o',
                symbol: 'q'
            }
        );

        let codec = LeetCodec::builder()
            .map('o', &['0'])
            .map('o', &['0', '*'])
            .build()
            .unwrap();
        assert_eq!(codec.substitutes_for('o'), &['0', '*']);
        assert_eq!(codec.letters_for('0'), Some(&ReverseLookup::Unambiguous('o')));
    }
}
