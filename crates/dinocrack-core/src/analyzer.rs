//! Grammar recovery from sample passwords.
//!
//! Each password is read as `adjective + Noun + NN`: the two-character suffix
//! is cut, the body is split into two fragments and each fragment is deleeted.
//! Recovered words go into a [`Vocabulary`]; every success is also kept in an
//! in-memory log for later validation.

use thiserror::Error;

use dinocrack_leet::{
    Deleeted, Deleeter, Dictionary, LeetCodec, Resolution, SplitError, SplitRule, capitalize,
    split_password,
};

use crate::vocabulary::Vocabulary;

/// Shortest word a fragment may deleet to.
pub const MIN_FRAGMENT_CHARS: usize = 2;

/// Failed examples kept in a [`BatchSummary`].
const MAX_FAILED_EXAMPLES: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("{side} fragment {fragment:?} deleets to {word:?}, too short")]
    FragmentTooShort {
        side: &'static str,
        fragment: String,
        word: String,
    },
}

/// One successfully analysed password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    pub adjective: String,
    pub noun: String,
    /// Two-digit suffix, empty when the suffix was not numeric.
    pub digits: String,
    pub original: String,
    /// `adjective + Noun + digits` with all leet removed.
    pub canonical: String,
    pub rule: SplitRule,
    pub adjective_resolution: Resolution,
    pub noun_resolution: Resolution,
}

impl AnalysisRecord {
    /// Number of fragments that needed a guess because no dictionary hit was found.
    pub fn fallbacks(&self) -> usize {
        [self.adjective_resolution, self.noun_resolution]
            .iter()
            .filter(|r| **r == Resolution::Fallback)
            .count()
    }
}

/// Outcome of one [`CorpusAnalyzer::analyze_corpus`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub new_adjectives: usize,
    pub new_nouns: usize,
    pub ambiguous_fallbacks: usize,
    pub failed_examples: Vec<(String, ParseFailure)>,
}

impl BatchSummary {
    pub fn new_words(&self) -> usize {
        self.new_adjectives + self.new_nouns
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyzeMode {
    /// Keep the existing vocabulary and log.
    #[default]
    Append,
    /// Start from an empty vocabulary and log.
    Replace,
}

/// A logged record whose whole-body deleet disagrees with its split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMismatch {
    pub original: String,
    pub expected: String,
    pub deleeted: String,
}

pub struct CorpusAnalyzer<'a> {
    codec: &'a LeetCodec,
    dictionary: Option<&'a dyn Dictionary>,
    log: Vec<AnalysisRecord>,
}

impl<'a> CorpusAnalyzer<'a> {
    pub fn new(codec: &'a LeetCodec) -> Self {
        Self {
            codec,
            dictionary: None,
            log: Vec::new(),
        }
    }

    pub fn with_dictionary(mut self, dictionary: &'a dyn Dictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    fn deleeter(&self) -> Deleeter<'a> {
        let deleeter = Deleeter::new(self.codec);
        match self.dictionary {
            Some(dictionary) => deleeter.with_dictionary(dictionary),
            None => deleeter,
        }
    }

    /// Analyse one password without touching any vocabulary.
    pub fn analyze_password(&self, password: &str) -> Result<AnalysisRecord, ParseFailure> {
        let parts = split_password(password)?;
        let deleeter = self.deleeter();

        let adjective = checked_fragment(&deleeter, "adjective", parts.split.left)?;
        let noun = checked_fragment(&deleeter, "noun", parts.split.right)?;
        let digits = parts.digits().to_string();

        Ok(AnalysisRecord {
            canonical: format!("{}{}{}", adjective.word, capitalize(&noun.word), digits),
            adjective: adjective.word,
            noun: noun.word,
            digits,
            original: password.to_string(),
            rule: parts.split.rule,
            adjective_resolution: adjective.resolution,
            noun_resolution: noun.resolution,
        })
    }

    /// Analyse a batch of passwords into `vocabulary`.
    ///
    /// Failures are counted and skipped. A failed password inserts nothing.
    pub fn analyze_corpus<I, S>(
        &mut self,
        vocabulary: &mut Vocabulary,
        passwords: I,
        mode: AnalyzeMode,
    ) -> BatchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if mode == AnalyzeMode::Replace {
            vocabulary.clear();
            self.log.clear();
        }

        let before = vocabulary.stats();
        let mut summary = BatchSummary::default();

        for password in passwords {
            let password = password.as_ref();
            summary.total += 1;

            match self.analyze_password(password) {
                Ok(record) => {
                    vocabulary.insert_adjective(&record.adjective);
                    vocabulary.insert_noun(&record.noun);
                    summary.successful += 1;
                    summary.ambiguous_fallbacks += record.fallbacks();
                    self.log.push(record);
                }
                Err(failure) => {
                    tracing::debug!(password, error = %failure, "could not parse password");
                    summary.failed += 1;
                    if summary.failed_examples.len() < MAX_FAILED_EXAMPLES {
                        summary.failed_examples.push((password.to_string(), failure));
                    }
                }
            }
        }

        let after = vocabulary.stats();
        summary.new_adjectives = after.adjectives - before.adjectives;
        summary.new_nouns = after.nouns - before.nouns;

        tracing::info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            new_adjectives = summary.new_adjectives,
            new_nouns = summary.new_nouns,
            "analysed batch"
        );
        summary
    }

    /// Every record analysed since the last replace.
    pub fn log(&self) -> &[AnalysisRecord] {
        &self.log
    }

    /// Re-deleet the first `sample_size` logged bodies as a whole and report
    /// those that do not read back as `adjective + noun`.
    pub fn validate_patterns(&self, sample_size: usize) -> Vec<PatternMismatch> {
        let deleeter = self.deleeter();
        self.log
            .iter()
            .take(sample_size)
            .filter_map(|record| {
                let (body, _) = dinocrack_leet::split_suffix(&record.original);
                let deleeted = deleeter.deleet(body).word;
                let expected = format!("{}{}", record.adjective, record.noun);
                (!deleeted.eq_ignore_ascii_case(&expected)).then(|| PatternMismatch {
                    original: record.original.clone(),
                    expected,
                    deleeted,
                })
            })
            .collect()
    }
}

fn checked_fragment(
    deleeter: &Deleeter<'_>,
    side: &'static str,
    fragment: &str,
) -> Result<Deleeted, ParseFailure> {
    let deleeted = deleeter.deleet(fragment);
    if deleeted.word.chars().count() < MIN_FRAGMENT_CHARS {
        return Err(ParseFailure::FragmentTooShort {
            side,
            fragment: fragment.to_string(),
            word: deleeted.word,
        });
    }
    Ok(deleeted)
}
