//! Splitting a password into adjective and noun fragments.
//!
//! The last two characters are always treated as the numeric suffix and
//! removed before splitting. The remaining body is split by the first rule
//! that matches:
//!
//! 1. **CamelCase** – before the first uppercase letter after position 0
//!    (`wildLion` → `wild` + `Lion`)
//! 2. **SymbolBoundary** – a leading letter run followed by a non-letter
//!    (`ba)blob` → `ba` + `)blob`)
//! 3. **Midpoint** – roughly in half, at least two characters on the left

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Shortest password the splitter will look at.
pub const MIN_PASSWORD_CHARS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("password has {0} characters, need at least {min}", min = MIN_PASSWORD_CHARS)]
    TooShort(usize),

    #[error("body {0:?} leaves nothing right of the midpoint")]
    NoMidpoint(String),
}

/// Which heuristic produced a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitRule {
    CamelCase,
    SymbolBoundary,
    Midpoint,
}

impl SplitRule {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitRule::CamelCase => "camel_case",
            SplitRule::SymbolBoundary => "symbol_boundary",
            SplitRule::Midpoint => "midpoint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub left: &'a str,
    pub right: &'a str,
    pub rule: SplitRule,
}

/// A full password broken into body fragments and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPassword<'a> {
    pub body: &'a str,
    pub suffix: &'a str,
    pub split: Split<'a>,
}

impl SplitPassword<'_> {
    /// The suffix if both characters are digits, otherwise empty.
    pub fn digits(&self) -> &str {
        if self.suffix.len() == 2 && self.suffix.bytes().all(|b| b.is_ascii_digit()) {
            self.suffix
        } else {
            ""
        }
    }
}

/// Cut the last two characters off `password`.
///
/// Returns `(body, suffix)`. Strings of two characters or fewer are all suffix.
pub fn split_suffix(password: &str) -> (&str, &str) {
    let cut = password
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    password.split_at(cut)
}

/// Drop the suffix from `password` and split what is left.
pub fn split_password(password: &str) -> Result<SplitPassword<'_>, SplitError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_CHARS {
        return Err(SplitError::TooShort(len));
    }
    let (body, suffix) = split_suffix(password);
    let split = split_body(body)?;
    Ok(SplitPassword { body, suffix, split })
}

/// Split a password body (suffix already removed) into two fragments.
pub fn split_body(body: &str) -> Result<Split<'_>, SplitError> {
    if let Some(idx) = camel_boundary(body) {
        let (left, right) = body.split_at(idx);
        return Ok(Split {
            left,
            right,
            rule: SplitRule::CamelCase,
        });
    }

    static SYMBOL_BOUNDARY: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)^([A-Za-z]+)([^A-Za-z].+)$").unwrap());

    if let Some(caps) = SYMBOL_BOUNDARY.captures(body) {
        if let (Some(left), Some(right)) = (caps.get(1), caps.get(2)) {
            return Ok(Split {
                left: left.as_str(),
                right: right.as_str(),
                rule: SplitRule::SymbolBoundary,
            });
        }
    }

    let len = body.chars().count();
    let mid = (len / 2).max(2);
    if mid >= len {
        return Err(SplitError::NoMidpoint(body.to_string()));
    }
    let idx = body
        .char_indices()
        .nth(mid)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    let (left, right) = body.split_at(idx);
    Ok(Split {
        left,
        right,
        rule: SplitRule::Midpoint,
    })
}

fn camel_boundary(body: &str) -> Option<usize> {
    body.char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_uppercase())
        .map(|(i, _)| i)
}
