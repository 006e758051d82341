//! Configuration for analysis, fetching and generation.
//!
//! [`Config`] mirrors `dinocrack.toml`. Every section is optional and falls
//! back to the defaults below; the CLI layers flags and environment
//! variables on top.
//!
//! ```toml
//! [paths]
//! adjectives = "adjectives.txt"
//! nouns = "nouns.txt"
//!
//! [generator]
//! mode = "cartesian"
//! digits = "00-99"
//! preview = 20
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;
use crate::persist::VocabularyPaths;

pub const DEFAULT_URL: &str = "http://www.dinopass.com/password/strong";

/// Length window presets for the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// 7–15 characters.
    #[default]
    Comprehensive,
    /// 7–12 characters.
    Cartesian,
}

impl GenerationMode {
    pub fn default_lengths(self) -> (usize, usize) {
        match self {
            GenerationMode::Comprehensive => (7, 15),
            GenerationMode::Cartesian => (7, 12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Comprehensive => "comprehensive",
            GenerationMode::Cartesian => "cartesian",
        }
    }
}

impl FromStr for GenerationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comprehensive" => Ok(GenerationMode::Comprehensive),
            "cartesian" => Ok(GenerationMode::Cartesian),
            other => Err(CoreError::Config(format!("unknown generation mode {other:?}"))),
        }
    }
}

/// Two-digit suffix values to append, sorted and unique.
///
/// Parsed from ranges and lists: `"00-99"`, `"7,13,42"`, `"0-9,42"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct DigitRange(Vec<u8>);

impl DigitRange {
    /// 00 through 99.
    pub fn full() -> Self {
        Self((0..=99).collect())
    }

    pub fn values(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DigitRange {
    fn default() -> Self {
        Self::full()
    }
}

impl TryFrom<Vec<u8>> for DigitRange {
    type Error = CoreError;

    fn try_from(mut values: Vec<u8>) -> Result<Self, Self::Error> {
        if let Some(bad) = values.iter().find(|v| **v > 99) {
            return Err(CoreError::Config(format!("digit suffix {bad} is above 99")));
        }
        if values.is_empty() {
            return Err(CoreError::Config("digit range is empty".into()));
        }
        values.sort_unstable();
        values.dedup();
        Ok(Self(values))
    }
}

impl FromStr for DigitRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| CoreError::Config(format!("invalid digit suffix {part:?}")))
        };

        let mut values = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let (lo, hi) = (parse(lo)?, parse(hi)?);
                    if lo > hi {
                        return Err(CoreError::Config(format!("digit range {part:?} is reversed")));
                    }
                    values.extend(lo..=hi);
                }
                None => values.push(parse(part)?),
            }
        }
        Self::try_from(values)
    }
}

impl TryFrom<String> for DigitRange {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for DigitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0.first(), self.0.last()) {
            (Some(lo), Some(hi)) if usize::from(hi - lo) + 1 == self.0.len() => {
                write!(f, "{lo:02}-{hi:02}")
            }
            _ => {
                let parts: Vec<String> = self.0.iter().map(|v| format!("{v:02}")).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

/// Validated settings for [`CandidateGenerator`](crate::CandidateGenerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub digits: DigitRange,
    pub min_length: usize,
    pub max_length: usize,
    /// Stop once this many candidates were written.
    pub max_results: Option<usize>,
    pub dedupe: bool,
    /// Number of leading candidates echoed back in the stats.
    pub preview: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let (min_length, max_length) = GenerationMode::default().default_lengths();
        Self {
            digits: DigitRange::full(),
            min_length,
            max_length,
            max_results: None,
            dedupe: true,
            preview: 0,
        }
    }
}

/// Builder for [`GeneratorConfig`].
///
/// Explicit lengths win over the mode preset regardless of call order.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfigBuilder {
    mode: GenerationMode,
    digits: Option<DigitRange>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    max_results: Option<usize>,
    dedupe: Option<bool>,
    preview: Option<usize>,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn digits(mut self, digits: DigitRange) -> Self {
        self.digits = Some(digits);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// `0` means no limit.
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = Some(dedupe);
        self
    }

    pub fn preview(mut self, count: usize) -> Self {
        self.preview = Some(count);
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, CoreError> {
        let (mode_min, mode_max) = self.mode.default_lengths();
        let min_length = self.min_length.unwrap_or(mode_min);
        let max_length = self.max_length.unwrap_or(mode_max);
        if min_length > max_length {
            return Err(CoreError::Config(format!(
                "min_length {min_length} is greater than max_length {max_length}"
            )));
        }

        Ok(GeneratorConfig {
            digits: self.digits.unwrap_or_default(),
            min_length,
            max_length,
            max_results: self.max_results.filter(|m| *m > 0),
            dedupe: self.dedupe.unwrap_or(true),
            preview: self.preview.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub adjectives: PathBuf,
    pub nouns: PathBuf,
    /// Word list for ambiguous deleet; the embedded list is used when unset.
    pub dictionary: Option<PathBuf>,
    pub wordlist: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            adjectives: PathBuf::from("adjectives.txt"),
            nouns: PathBuf::from("nouns.txt"),
            dictionary: None,
            wordlist: PathBuf::from("dinopass_strong_pass.txt"),
        }
    }
}

impl PathsConfig {
    pub fn vocabulary(&self) -> VocabularyPaths {
        VocabularyPaths::new(&self.adjectives, &self.nouns)
    }
}

/// Settings for the HTTP password source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub url: String,
    /// Requests in flight at once.
    pub workers: usize,
    pub request_timeout_secs: u64,
    /// How long to wait for the next result before giving up on a batch.
    pub collect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            workers: 10,
            request_timeout_secs: 5,
            collect_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SaturationConfig {
    pub target_samples: usize,
    pub batch_size: usize,
    /// Growth ratio below which a category counts as saturated.
    pub min_new_ratio: f64,
    pub max_batches: usize,
    /// Batches without any new word that are tolerated before stopping.
    pub confirm_after_batches: usize,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            target_samples: 5000,
            batch_size: 500,
            min_new_ratio: 0.01,
            max_batches: 20,
            confirm_after_batches: 3,
        }
    }
}

/// `[generator]` section; unset fields defer to the mode preset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub mode: GenerationMode,
    pub digits: Option<DigitRange>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub max_results: Option<usize>,
    pub dedupe: bool,
    pub preview: usize,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            digits: None,
            min_length: None,
            max_length: None,
            max_results: None,
            dedupe: true,
            preview: 20,
        }
    }
}

impl GeneratorSection {
    pub fn to_builder(&self) -> GeneratorConfigBuilder {
        let mut builder = GeneratorConfigBuilder::new()
            .mode(self.mode)
            .dedupe(self.dedupe)
            .preview(self.preview);
        if let Some(digits) = &self.digits {
            builder = builder.digits(digits.clone());
        }
        if let Some(len) = self.min_length {
            builder = builder.min_length(len);
        }
        if let Some(len) = self.max_length {
            builder = builder.max_length(len);
        }
        if let Some(max) = self.max_results {
            builder = builder.max_results(max);
        }
        builder
    }
}

/// Contents of `dinocrack.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
    pub generator: GeneratorSection,
    pub saturation: SaturationConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_range_parsing() {
        assert_eq!("00-99".parse::<DigitRange>().unwrap(), DigitRange::full());
        assert_eq!(
            "42,7,13,7".parse::<DigitRange>().unwrap().values(),
            &[7, 13, 42]
        );
        assert_eq!(
            "0-3, 50".parse::<DigitRange>().unwrap().values(),
            &[0, 1, 2, 3, 50]
        );
    }

    #[test]
    fn test_digit_range_rejects() {
        assert!("100".parse::<DigitRange>().is_err());
        assert!("9-1".parse::<DigitRange>().is_err());
        assert!("".parse::<DigitRange>().is_err());
        assert!("a-b".parse::<DigitRange>().is_err());
    }

    #[test]
    fn test_digit_range_display() {
        assert_eq!(DigitRange::full().to_string(), "00-99");
        assert_eq!("7,13".parse::<DigitRange>().unwrap().to_string(), "07,13");
    }

    #[test]
    fn test_builder_mode_presets() {
        let config = GeneratorConfigBuilder::new().build().unwrap();
        assert_eq!((config.min_length, config.max_length), (7, 15));
        assert!(config.dedupe);

        let config = GeneratorConfigBuilder::new()
            .max_length(10)
            .mode(GenerationMode::Cartesian)
            .build()
            .unwrap();
        assert_eq!((config.min_length, config.max_length), (7, 10));
    }

    #[test]
    fn test_builder_validation() {
        let err = GeneratorConfigBuilder::new()
            .min_length(12)
            .max_length(8)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("min_length 12"));

        let config = GeneratorConfigBuilder::new().max_results(0).build().unwrap();
        assert_eq!(config.max_results, None);
    }

    #[test]
    fn test_toml_config() {
        let config = Config::from_toml_str(
            r#"
            [paths]
            adjectives = "data/adj.txt"

            [fetch]
            workers = 4

            [generator]
            mode = "cartesian"
            digits = "10-19"
            max_results = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.adjectives, PathBuf::from("data/adj.txt"));
        assert_eq!(config.paths.nouns, PathBuf::from("nouns.txt"));
        assert_eq!(config.fetch.workers, 4);
        assert_eq!(config.fetch.url, DEFAULT_URL);
        assert_eq!(config.saturation, SaturationConfig::default());

        let generator = config.generator.to_builder().build().unwrap();
        assert_eq!(generator.max_length, 12);
        assert_eq!(generator.digits.len(), 10);
        assert_eq!(generator.max_results, Some(500));
        assert_eq!(generator.preview, 20);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config =
            Config::from_toml_str(include_str!("../../../dinocrack.example.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml_rejects_bad_digits() {
        assert!(Config::from_toml_str("[generator]\ndigits = \"5-150\"").is_err());
    }
}
