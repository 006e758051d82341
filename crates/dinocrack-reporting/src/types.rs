use std::fmt;

/// Why a sampled password is missing from a generated wordlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissCategory {
    /// Shorter than any length the generator emits.
    TooShort,
    /// Longer than any length the generator emits.
    TooLong,
    /// No leet in the body at all.
    NoLeet,
    /// Numeric and symbol leet together.
    MixedLeet,
    /// More than one substituted position.
    MultipleLeet,
    /// Well-formed, so one of its words is not in the vocabulary yet.
    VocabularyGap,
}

impl MissCategory {
    pub const ALL: [MissCategory; 6] = [
        MissCategory::TooShort,
        MissCategory::TooLong,
        MissCategory::NoLeet,
        MissCategory::MixedLeet,
        MissCategory::MultipleLeet,
        MissCategory::VocabularyGap,
    ];

    pub fn description(self) -> &'static str {
        match self {
            MissCategory::TooShort => "Too short",
            MissCategory::TooLong => "Too long",
            MissCategory::NoLeet => "No leet substitution",
            MissCategory::MixedLeet => "Mixed numeric and symbol leet",
            MissCategory::MultipleLeet => "More than one leet position",
            MissCategory::VocabularyGap => "Word missing from vocabulary",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissCategory::TooShort => "too_short",
            MissCategory::TooLong => "too_long",
            MissCategory::NoLeet => "no_leet",
            MissCategory::MixedLeet => "mixed_leet",
            MissCategory::MultipleLeet => "multiple_leet",
            MissCategory::VocabularyGap => "vocabulary_gap",
        }
    }
}

impl std::str::FromStr for MissCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "too_short" => Ok(MissCategory::TooShort),
            "too_long" => Ok(MissCategory::TooLong),
            "no_leet" => Ok(MissCategory::NoLeet),
            "mixed_leet" => Ok(MissCategory::MixedLeet),
            "multiple_leet" => Ok(MissCategory::MultipleLeet),
            "vocabulary_gap" => Ok(MissCategory::VocabularyGap),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MissCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse rating of a coverage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageVerdict {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl CoverageVerdict {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 95.0 {
            CoverageVerdict::Excellent
        } else if pct >= 85.0 {
            CoverageVerdict::Good
        } else if pct >= 70.0 {
            CoverageVerdict::Moderate
        } else {
            CoverageVerdict::Low
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CoverageVerdict::Excellent => "Excellent coverage",
            CoverageVerdict::Good => "Good coverage",
            CoverageVerdict::Moderate => "Moderate coverage, consider fetching more samples",
            CoverageVerdict::Low => "Low coverage, significant gaps exist",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoverageVerdict::Excellent => "excellent",
            CoverageVerdict::Good => "good",
            CoverageVerdict::Moderate => "moderate",
            CoverageVerdict::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_category_round_trips_through_str() {
        for category in MissCategory::ALL {
            assert_eq!(category.as_str().parse::<MissCategory>(), Ok(category));
        }
        assert!("parsing_issues".parse::<MissCategory>().is_err());
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(CoverageVerdict::from_percentage(100.0), CoverageVerdict::Excellent);
        assert_eq!(CoverageVerdict::from_percentage(95.0), CoverageVerdict::Excellent);
        assert_eq!(CoverageVerdict::from_percentage(94.99), CoverageVerdict::Good);
        assert_eq!(CoverageVerdict::from_percentage(85.0), CoverageVerdict::Good);
        assert_eq!(CoverageVerdict::from_percentage(70.0), CoverageVerdict::Moderate);
        assert_eq!(CoverageVerdict::from_percentage(69.9), CoverageVerdict::Low);
        assert_eq!(CoverageVerdict::from_percentage(0.0), CoverageVerdict::Low);
    }
}
