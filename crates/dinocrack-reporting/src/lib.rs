//! Coverage reporting: how much of a live sample a generated wordlist catches,
//! and why the rest was missed.

pub mod coverage;
pub mod types;

pub use coverage::{
    CoverageReport, LONGEST_CANDIDATE, MAX_LISTED_MISSES, PASSING_COVERAGE_PCT, ReportError,
    SHORTEST_CANDIDATE, ValiditySummary, categorize_miss, check_coverage, load_wordlist,
    validity_summary,
};
pub use types::{CoverageVerdict, MissCategory};
