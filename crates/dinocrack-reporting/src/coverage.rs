//! Checking sampled passwords against a generated wordlist.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use dinocrack_leet::{LeetCodec, LeetKind};

use crate::types::{CoverageVerdict, MissCategory};

/// Misses kept verbatim in a [`CoverageReport`].
pub const MAX_LISTED_MISSES: usize = 100;

/// Invalid samples kept verbatim in a [`ValiditySummary`].
const MAX_INVALID_EXAMPLES: usize = 10;

/// Coverage below this is treated as a failing run.
pub const PASSING_COVERAGE_PCT: f64 = 80.0;

/// Generator length window the categories are judged against.
pub const SHORTEST_CANDIDATE: usize = 7;
pub const LONGEST_CANDIDATE: usize = 15;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("wordlist not found: {}", .0.display())]
    MissingWordlist(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a newline-delimited wordlist into a set, skipping blank lines.
pub fn load_wordlist(path: &Path) -> Result<HashSet<String>, ReportError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ReportError::MissingWordlist(path.to_path_buf()),
        _ => ReportError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut words = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ReportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }
    tracing::info!(path = %path.display(), candidates = words.len(), "loaded wordlist");
    Ok(words)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub total: usize,
    pub matches: usize,
    pub misses: usize,
    pub coverage_pct: f64,
    /// The first misses, in sample order.
    pub missing: Vec<String>,
    /// Every miss, categorised.
    pub categories: BTreeMap<MissCategory, usize>,
}

impl CoverageReport {
    pub fn verdict(&self) -> CoverageVerdict {
        CoverageVerdict::from_percentage(self.coverage_pct)
    }

    pub fn is_passing(&self) -> bool {
        self.coverage_pct >= PASSING_COVERAGE_PCT
    }
}

/// Compare `samples` against `wordlist`.
pub fn check_coverage<S: AsRef<str>>(
    codec: &LeetCodec,
    wordlist: &HashSet<String>,
    samples: &[S],
) -> CoverageReport {
    let mut matches = 0;
    let mut missing = Vec::new();
    let mut categories = BTreeMap::new();

    for sample in samples {
        let sample = sample.as_ref();
        if wordlist.contains(sample) {
            matches += 1;
            continue;
        }
        *categories.entry(categorize_miss(codec, sample)).or_insert(0) += 1;
        if missing.len() < MAX_LISTED_MISSES {
            missing.push(sample.to_string());
        }
    }

    let total = samples.len();
    let coverage_pct = if total > 0 {
        matches as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    tracing::info!(total, matches, coverage_pct, "coverage checked");

    CoverageReport {
        total,
        matches,
        misses: total - matches,
        coverage_pct,
        missing,
        categories,
    }
}

/// Best guess at why a well-formed sample was not generated.
pub fn categorize_miss(codec: &LeetCodec, password: &str) -> MissCategory {
    let len = password.chars().count();
    if len < SHORTEST_CANDIDATE {
        return MissCategory::TooShort;
    }
    if len > LONGEST_CANDIDATE {
        return MissCategory::TooLong;
    }

    let class = codec.classify(password);
    match class.kind() {
        LeetKind::None => MissCategory::NoLeet,
        LeetKind::Mixed => MissCategory::MixedLeet,
        LeetKind::Numeric | LeetKind::Symbol if class.leet_positions > 1 => {
            MissCategory::MultipleLeet
        }
        LeetKind::Numeric | LeetKind::Symbol => MissCategory::VocabularyGap,
    }
}

/// How many samples satisfy the single-leet-class rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValiditySummary {
    pub total: usize,
    pub valid: usize,
    pub invalid_examples: Vec<String>,
}

impl ValiditySummary {
    pub fn valid_fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}

pub fn validity_summary<S: AsRef<str>>(codec: &LeetCodec, samples: &[S]) -> ValiditySummary {
    let mut summary = ValiditySummary {
        total: samples.len(),
        ..ValiditySummary::default()
    };
    for sample in samples {
        let sample = sample.as_ref();
        if codec.is_valid_leet_combination(sample) {
            summary.valid += 1;
        } else if summary.invalid_examples.len() < MAX_INVALID_EXAMPLES {
            summary.invalid_examples.push(sample.to_string());
        }
    }
    summary
}
