//! Per-word variant sets used by the generator.

use crate::classify::LeetKind;
use crate::codec::{LeetCodec, WordRole};

/// Which bucket of a [`WordVariations`] a variant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Base,
    Numeric,
    Symbol,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Base => "base",
            VariantKind::Numeric => "numeric",
            VariantKind::Symbol => "symbol",
        }
    }
}

/// A word's base form and its single-substitution variants, split by class.
///
/// Variants whose body ends up mixed (possible when the stored word already
/// carries a non-letter) are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordVariations {
    pub base: String,
    pub numeric: Vec<String>,
    pub symbol: Vec<String>,
}

impl WordVariations {
    pub fn new(codec: &LeetCodec, word: &str, role: WordRole) -> Self {
        let base = role.apply_case(word);
        let mut numeric = Vec::new();
        let mut symbol = Vec::new();

        for variant in codec.single_substitutions(word, role) {
            if variant == base {
                continue;
            }
            match codec.classify_body(&variant).kind() {
                LeetKind::Numeric => numeric.push(variant),
                LeetKind::Symbol => symbol.push(variant),
                LeetKind::Mixed | LeetKind::None => {}
            }
        }

        Self {
            base,
            numeric,
            symbol,
        }
    }

    pub fn get(&self, kind: VariantKind) -> &[String] {
        match kind {
            VariantKind::Base => std::slice::from_ref(&self.base),
            VariantKind::Numeric => &self.numeric,
            VariantKind::Symbol => &self.symbol,
        }
    }
}
