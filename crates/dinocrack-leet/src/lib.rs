//! Leet-speak primitives for dinocrack.
//!
//! - [`LeetCodec`]: letter ↔ symbol table, single-substitution variants
//! - [`split_password`] / [`split_body`]: adjective/noun fragment heuristics
//! - [`Deleeter`]: symbol → letter reversal with [`Dictionary`] disambiguation
//! - [`LeetCodec::classify`]: numeric / symbol / mixed / none
//! - [`WordVariations`]: base, numeric and symbol variants of one word

pub mod classify;
pub mod codec;
pub mod deleet;
pub mod dictionary;
pub mod split;
pub mod variations;

pub use classify::{LeetClass, LeetKind, VALIDATION_CASES, ValidationCase};
pub use codec::{LeetCodec, LeetCodecBuilder, LeetError, ReverseLookup, WordRole, capitalize};
pub use deleet::{DEFAULT_CANDIDATE_CAP, Deleeted, Deleeter, Resolution};
pub use dictionary::Dictionary;
pub use split::{
    MIN_PASSWORD_CHARS, Split, SplitError, SplitPassword, SplitRule, split_body, split_password,
    split_suffix,
};
pub use variations::{VariantKind, WordVariations};
