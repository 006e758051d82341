//! Grammar-constrained candidate generation.
//!
//! Every candidate has the form `adjective + Noun + NN` with leet applied to
//! exactly one of the two words. Both-base and both-leet pairs are never
//! produced, so the search space stays close to what the target actually
//! emits.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tokio_util::sync::CancellationToken;

use dinocrack_leet::{LeetCodec, VariantKind, WordRole, WordVariations};

use crate::config::GeneratorConfig;
use crate::error::CoreError;
use crate::vocabulary::Vocabulary;

/// Which word carries the leet substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    BaseNumeric,
    BaseSymbol,
    NumericBase,
    SymbolBase,
}

impl Combination {
    pub const ALL: [Combination; 4] = [
        Combination::BaseNumeric,
        Combination::BaseSymbol,
        Combination::NumericBase,
        Combination::SymbolBase,
    ];

    /// Variant buckets for (adjective, noun).
    pub fn kinds(self) -> (VariantKind, VariantKind) {
        match self {
            Combination::BaseNumeric => (VariantKind::Base, VariantKind::Numeric),
            Combination::BaseSymbol => (VariantKind::Base, VariantKind::Symbol),
            Combination::NumericBase => (VariantKind::Numeric, VariantKind::Base),
            Combination::SymbolBase => (VariantKind::Symbol, VariantKind::Base),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Combination::BaseNumeric => "base adjective + numeric noun",
            Combination::BaseSymbol => "base adjective + symbol noun",
            Combination::NumericBase => "numeric adjective + base noun",
            Combination::SymbolBase => "symbol adjective + base noun",
        }
    }
}

/// Why a generation run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// Every combination was enumerated.
    #[default]
    Exhausted,
    /// `max_results` candidates were written.
    LimitReached,
    Cancelled,
    /// No adjectives or no nouns to combine.
    EmptyVocabulary,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Exhausted => "exhausted",
            StopReason::LimitReached => "limit reached",
            StopReason::Cancelled => "cancelled",
            StopReason::EmptyVocabulary => "empty vocabulary",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub written: usize,
    pub rejected_length: usize,
    pub rejected_invalid: usize,
    pub duplicates: usize,
    /// First few written candidates, with the combination that produced them.
    pub preview: Vec<(Combination, String)>,
    pub stop: StopReason,
}

/// Reported after each adjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateProgress {
    pub adjectives_done: usize,
    pub adjectives_total: usize,
    pub written: usize,
}

/// Destination for generated candidates.
pub trait CandidateSink {
    fn accept(&mut self, candidate: &str) -> io::Result<()>;
}

impl CandidateSink for Vec<String> {
    fn accept(&mut self, candidate: &str) -> io::Result<()> {
        self.push(candidate.to_string());
        Ok(())
    }
}

/// Newline-delimited wordlist output.
pub struct WordlistWriter<W: Write> {
    inner: BufWriter<W>,
}

impl WordlistWriter<File> {
    pub fn create(path: &Path) -> Result<Self, CoreError> {
        let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> WordlistWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
        }
    }

    /// Flush buffered output and return the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> CandidateSink for WordlistWriter<W> {
    fn accept(&mut self, candidate: &str) -> io::Result<()> {
        self.inner.write_all(candidate.as_bytes())?;
        self.inner.write_all(b"\n")
    }
}

/// Enumerates candidates from a [`Vocabulary`].
///
/// The seen-set lives as long as the generator, so running it twice over the
/// same vocabulary writes nothing new the second time when dedupe is on.
pub struct CandidateGenerator<'a> {
    codec: &'a LeetCodec,
    config: &'a GeneratorConfig,
    seen: HashSet<String>,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(codec: &'a LeetCodec, config: &'a GeneratorConfig) -> Self {
        Self {
            codec,
            config,
            seen: HashSet::new(),
        }
    }

    /// Number of candidates before length, validity and duplicate filtering.
    pub fn estimate(&self, vocabulary: &Vocabulary) -> u64 {
        let adjectives = self.variations(vocabulary.adjectives(), WordRole::Adjective);
        let nouns = self.variations(vocabulary.nouns(), WordRole::Noun);

        let mut pairs: u64 = 0;
        for adj in &adjectives {
            for noun in &nouns {
                for combination in Combination::ALL {
                    let (adj_kind, noun_kind) = combination.kinds();
                    pairs += (adj.get(adj_kind).len() * noun.get(noun_kind).len()) as u64;
                }
            }
        }
        pairs * self.config.digits.len() as u64
    }

    /// Write every candidate for `vocabulary` into `sink`.
    ///
    /// Cancellation is checked before each candidate; whatever was written
    /// up to that point stays in the sink.
    pub fn generate<S>(
        &mut self,
        vocabulary: &Vocabulary,
        sink: &mut S,
        cancel: &CancellationToken,
        mut progress: impl FnMut(GenerateProgress),
    ) -> Result<GenerationStats, CoreError>
    where
        S: CandidateSink + ?Sized,
    {
        let mut stats = GenerationStats::default();
        if !vocabulary.is_usable() {
            tracing::warn!(
                adjectives = vocabulary.adjectives().len(),
                nouns = vocabulary.nouns().len(),
                "vocabulary is empty, nothing to generate"
            );
            stats.stop = StopReason::EmptyVocabulary;
            return Ok(stats);
        }

        let adjectives = self.variations(vocabulary.adjectives(), WordRole::Adjective);
        let nouns = self.variations(vocabulary.nouns(), WordRole::Noun);
        let config = self.config;
        let digits = config.digits.values();

        'outer: for (done, adj) in adjectives.iter().enumerate() {
            for noun in &nouns {
                for combination in Combination::ALL {
                    let (adj_kind, noun_kind) = combination.kinds();
                    for adj_variant in adj.get(adj_kind) {
                        for noun_variant in noun.get(noun_kind) {
                            for &digit in digits {
                                if cancel.is_cancelled() {
                                    stats.stop = StopReason::Cancelled;
                                    break 'outer;
                                }

                                let candidate = format!("{adj_variant}{noun_variant}{digit:02}");
                                if !self.emit(candidate, combination, sink, &mut stats)? {
                                    continue;
                                }
                                if config.max_results.is_some_and(|max| stats.written >= max) {
                                    stats.stop = StopReason::LimitReached;
                                    break 'outer;
                                }
                            }
                        }
                    }
                }
            }

            progress(GenerateProgress {
                adjectives_done: done + 1,
                adjectives_total: adjectives.len(),
                written: stats.written,
            });
        }

        tracing::info!(
            written = stats.written,
            rejected_length = stats.rejected_length,
            rejected_invalid = stats.rejected_invalid,
            duplicates = stats.duplicates,
            stop = stats.stop.as_str(),
            "generation finished"
        );
        Ok(stats)
    }

    /// Filter one candidate and hand it to the sink. Returns whether it was written.
    fn emit<S>(
        &mut self,
        candidate: String,
        combination: Combination,
        sink: &mut S,
        stats: &mut GenerationStats,
    ) -> Result<bool, CoreError>
    where
        S: CandidateSink + ?Sized,
    {
        let len = candidate.chars().count();
        if len < self.config.min_length || len > self.config.max_length {
            stats.rejected_length += 1;
            return Ok(false);
        }
        if !self.codec.is_valid_leet_combination(&candidate) {
            stats.rejected_invalid += 1;
            return Ok(false);
        }
        if self.config.dedupe && !self.seen.insert(candidate.clone()) {
            stats.duplicates += 1;
            return Ok(false);
        }

        sink.accept(&candidate).map_err(CoreError::Sink)?;
        stats.written += 1;
        if stats.preview.len() < self.config.preview {
            stats.preview.push((combination, candidate));
        }
        Ok(true)
    }

    fn variations<'w>(
        &self,
        words: impl IntoIterator<Item = &'w String>,
        role: WordRole,
    ) -> Vec<WordVariations> {
        words
            .into_iter()
            .map(|word| WordVariations::new(self.codec, word, role))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DigitRange, GeneratorConfigBuilder};

    fn config(digits: &str) -> GeneratorConfig {
        GeneratorConfigBuilder::new()
            .digits(digits.parse::<DigitRange>().unwrap())
            .preview(3)
            .build()
            .unwrap()
    }

    fn generate(vocab: &Vocabulary, config: &GeneratorConfig) -> (Vec<String>, GenerationStats) {
        let codec = LeetCodec::dinopass();
        let mut out = Vec::new();
        let stats = CandidateGenerator::new(&codec, config)
            .generate(vocab, &mut out, &CancellationToken::new(), |_| {})
            .unwrap();
        (out, stats)
    }

    #[test]
    fn test_single_pair_output() {
        let vocab = Vocabulary::from_words(["wild"], ["lion"]);
        let (out, stats) = generate(&vocab, &config("42"));

        // neither word has a numeric variant, so only symbol pairs come out
        assert!(out.contains(&"wildL!on42".to_string()));
        assert!(out.contains(&"w!ldLion42".to_string()));
        assert!(!out.contains(&"wildLion42".to_string()));
        assert_eq!(stats.written, 6);
        assert_eq!(stats.written, out.len());
        assert_eq!(stats.stop, StopReason::Exhausted);
        assert_eq!(stats.preview.len(), 3);
    }

    #[test]
    fn test_loop_order_is_deterministic() {
        let vocab = Vocabulary::from_words(["wild", "brave"], ["lion", "eagle"]);
        let (first, _) = generate(&vocab, &config("07,42"));
        let (second, _) = generate(&vocab, &config("07,42"));
        assert_eq!(first, second);
        // adjectives in sorted order, digits innermost
        assert!(first[0].starts_with("brave") || first[0].starts_with("br@ve"));
        assert!(first[0].ends_with("07"));
        assert!(first[1].ends_with("42"));
    }

    #[test]
    fn test_length_filter() {
        let vocab = Vocabulary::from_words(["wild"], ["lion"]);
        let config = GeneratorConfigBuilder::new()
            .digits("42".parse().unwrap())
            .min_length(7)
            .max_length(9)
            .build()
            .unwrap();
        let (out, stats) = generate(&vocab, &config);
        assert!(out.is_empty());
        assert!(stats.rejected_length > 0);
    }

    #[test]
    fn test_max_results() {
        let vocab = Vocabulary::from_words(["wild", "brave"], ["lion", "eagle"]);
        let config = GeneratorConfigBuilder::new()
            .max_results(5)
            .build()
            .unwrap();
        let (out, stats) = generate(&vocab, &config);
        assert_eq!(out.len(), 5);
        assert_eq!(stats.stop, StopReason::LimitReached);
    }

    #[test]
    fn test_cancelled_before_start() {
        let codec = LeetCodec::dinopass();
        let config = config("00-99");
        let vocab = Vocabulary::from_words(["wild"], ["lion"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut out = Vec::new();
        let stats = CandidateGenerator::new(&codec, &config)
            .generate(&vocab, &mut out, &cancel, |_| {})
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.stop, StopReason::Cancelled);
    }

    #[test]
    fn test_cancelled_mid_run() {
        let codec = LeetCodec::dinopass();
        let config = config("00-99");
        let vocab = Vocabulary::from_words(["wild", "brave"], ["lion", "eagle"]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut written_at_cancel = None;

        let mut out = Vec::new();
        let stats = CandidateGenerator::new(&codec, &config)
            .generate(&vocab, &mut out, &cancel, |p| {
                if p.adjectives_done == 1 {
                    written_at_cancel = Some(p.written);
                    trigger.cancel();
                }
            })
            .unwrap();

        assert_eq!(stats.stop, StopReason::Cancelled);
        assert!(stats.written > 0);
        assert_eq!(out.len(), stats.written);
        // nothing from the second adjective made it out
        assert_eq!(written_at_cancel, Some(stats.written));
        assert!(out.iter().all(|c| c.starts_with("br")));
    }

    #[test]
    fn test_empty_vocabulary() {
        let vocab = Vocabulary::from_words(["wild"], Vec::<String>::new());
        let (out, stats) = generate(&vocab, &config("00-99"));
        assert!(out.is_empty());
        assert_eq!(stats.stop, StopReason::EmptyVocabulary);
    }

    #[test]
    fn test_seen_set_spans_runs() {
        let codec = LeetCodec::dinopass();
        let config = config("42");
        let vocab = Vocabulary::from_words(["wild"], ["lion"]);
        let mut generator = CandidateGenerator::new(&codec, &config);

        let mut out = Vec::new();
        let first = generator
            .generate(&vocab, &mut out, &CancellationToken::new(), |_| {})
            .unwrap();
        let second = generator
            .generate(&vocab, &mut out, &CancellationToken::new(), |_| {})
            .unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.duplicates, first.written);
    }

    #[test]
    fn test_estimate() {
        let codec = LeetCodec::dinopass();
        let config = config("00-09");
        let vocab = Vocabulary::from_words(["jade"], ["lion"]);
        // jade: 1 numeric, 4 symbol. Lion: 0 numeric, 2 symbol
        // base/num 0 + base/sym 2 + num/base 1 + sym/base 4 = 7 pairs
        assert_eq!(CandidateGenerator::new(&codec, &config).estimate(&vocab), 70);
    }

    #[test]
    fn test_progress_reported_per_adjective() {
        let codec = LeetCodec::dinopass();
        let config = config("42");
        let vocab = Vocabulary::from_words(["wild", "brave", "jade"], ["lion"]);
        let mut seen = Vec::new();
        CandidateGenerator::new(&codec, &config)
            .generate(
                &vocab,
                &mut Vec::<String>::new(),
                &CancellationToken::new(),
                |p| seen.push(p),
            )
            .unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].adjectives_done, 3);
        assert_eq!(seen[2].adjectives_total, 3);
    }

    #[test]
    fn test_wordlist_writer() {
        let mut writer = WordlistWriter::new(Vec::new());
        writer.accept("w!ldLion42").unwrap();
        writer.accept("wildL!on42").unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "w!ldLion42\nwildL!on42\n");
    }
}
