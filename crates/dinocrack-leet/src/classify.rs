//! Leet class detection for whole candidates.
//!
//! A valid password carries exactly one leet class: digits only or symbols
//! only. Base forms with no leet at all and mixes of both classes are invalid.

use std::collections::BTreeSet;

use crate::codec::LeetCodec;
use crate::split::split_suffix;

/// Overall class of a candidate's non-alphabetic content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeetKind {
    Numeric,
    Symbol,
    Mixed,
    None,
}

impl LeetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LeetKind::Numeric => "numeric",
            LeetKind::Symbol => "symbol",
            LeetKind::Mixed => "mixed",
            LeetKind::None => "none",
        }
    }
}

/// Leet evidence found in a password body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeetClass {
    pub has_numeric: bool,
    pub has_symbol: bool,
    /// Distinct non-alphabetic characters in the body.
    pub non_alpha: BTreeSet<char>,
    /// Non-alphabetic positions in the body, repeats included.
    pub leet_positions: usize,
}

impl LeetClass {
    pub fn kind(&self) -> LeetKind {
        match (self.has_numeric, self.has_symbol) {
            (true, false) => LeetKind::Numeric,
            (false, true) => LeetKind::Symbol,
            (true, true) => LeetKind::Mixed,
            (false, false) => LeetKind::None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.has_numeric != self.has_symbol
    }
}

impl LeetCodec {
    /// Classify a full candidate. The last two characters are the digit
    /// suffix and are not scanned.
    pub fn classify(&self, candidate: &str) -> LeetClass {
        let (body, _) = split_suffix(candidate);
        self.classify_body(body)
    }

    /// Classify a string with no suffix attached.
    pub fn classify_body(&self, body: &str) -> LeetClass {
        let mut class = LeetClass::default();
        for c in body.chars().filter(|c| !c.is_ascii_alphabetic()) {
            class.leet_positions += 1;
            class.non_alpha.insert(c);
        }
        class.has_numeric = class.non_alpha.iter().any(|&c| self.is_numeric_leet(c));
        class.has_symbol = class.non_alpha.iter().any(|&c| self.is_symbol_leet(c));
        class
    }

    pub fn is_valid_leet_combination(&self, candidate: &str) -> bool {
        self.classify(candidate).is_valid()
    }
}

/// A documented classifier expectation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationCase {
    pub password: &'static str,
    pub expected: bool,
    pub description: &'static str,
}

/// Reference cases for [`LeetCodec::is_valid_leet_combination`].
pub const VALIDATION_CASES: &[ValidationCase] = &[
    ValidationCase { password: "w1ldLion42", expected: true, description: "numeric leet adj only" },
    ValidationCase { password: "wildL10n42", expected: true, description: "numeric leet noun only" },
    ValidationCase { password: "w!ldLion42", expected: true, description: "symbol leet adj only" },
    ValidationCase { password: "wildL!on42", expected: true, description: "symbol leet noun only" },
    ValidationCase { password: "wild7iger99", expected: true, description: "numeric leet noun only" },
    ValidationCase { password: "br@veEagle23", expected: true, description: "symbol leet adj only" },
    ValidationCase { password: "wildLion42", expected: false, description: "base form - no leet" },
    ValidationCase { password: "gentleTiger99", expected: false, description: "base form - no leet" },
    ValidationCase { password: "w1ldL!on42", expected: false, description: "mixed: numeric adj + symbol noun" },
    ValidationCase { password: "w!ldL10n42", expected: false, description: "mixed: symbol adj + numeric noun" },
    ValidationCase { password: "w1ld7!ger42", expected: false, description: "mixed: numeric and symbol in noun" },
    ValidationCase { password: "w!1dLion42", expected: false, description: "mixed: symbol and numeric in adj" },
];
