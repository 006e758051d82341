//! Corpus analysis and wordlist generation for dinocrack.
//!
//! The pipeline runs in three stages:
//!
//! 1. **Analyse**: [`CorpusAnalyzer`] splits sample passwords and deleets the
//!    fragments into a [`Vocabulary`] of adjectives and nouns
//! 2. **Saturate**: [`fetch_until_saturation`] repeats analysis over fresh
//!    batches from a [`PasswordSource`] until new words dry up
//! 3. **Generate**: [`CandidateGenerator`] enumerates single-leet
//!    `adjective + Noun + NN` candidates into a [`CandidateSink`]
//!
//! Vocabulary lists are persisted as flat files (see [`persist`]).

pub mod analyzer;
pub mod config;
pub mod error;
pub mod generator;
pub mod persist;
pub mod saturation;
pub mod source;
pub mod vocabulary;

pub use analyzer::{
    AnalysisRecord, AnalyzeMode, BatchSummary, CorpusAnalyzer, MIN_FRAGMENT_CHARS, ParseFailure,
    PatternMismatch,
};
pub use config::{
    Config, DEFAULT_URL, DigitRange, FetchConfig, GenerationMode, GeneratorConfig,
    GeneratorConfigBuilder, GeneratorSection, PathsConfig, SaturationConfig,
};
pub use error::CoreError;
pub use generator::{
    CandidateGenerator, CandidateSink, Combination, GenerateProgress, GenerationStats,
    StopReason, WordlistWriter,
};
pub use persist::{VocabularyPaths, count_tokens, load_tokens, save_tokens};
pub use saturation::{
    BatchReport, SaturationStop, SaturationSummary, fetch_until_saturation, growth_ratio,
};
pub use source::{FetchOutcome, PasswordSource};
pub use vocabulary::{Vocabulary, VocabularyStats};

// Re-export so downstream crates share one token type
pub use tokio_util::sync::CancellationToken;
