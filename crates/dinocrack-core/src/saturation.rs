//! Fetch-and-analyse loop that stops once new samples stop adding words.

use tokio_util::sync::CancellationToken;

use crate::analyzer::{AnalyzeMode, BatchSummary, CorpusAnalyzer};
use crate::config::SaturationConfig;
use crate::error::CoreError;
use crate::persist::VocabularyPaths;
use crate::source::PasswordSource;
use crate::vocabulary::{Vocabulary, VocabularyStats};

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturationStop {
    TargetReached,
    MaxBatches,
    /// Both growth ratios fell below the threshold.
    Saturated,
    /// A late batch added no words at all.
    NoGrowth,
    /// The source returned nothing.
    SourceExhausted,
    Cancelled,
}

impl SaturationStop {
    pub fn as_str(self) -> &'static str {
        match self {
            SaturationStop::TargetReached => "target reached",
            SaturationStop::MaxBatches => "batch limit reached",
            SaturationStop::Saturated => "saturated",
            SaturationStop::NoGrowth => "no new words",
            SaturationStop::SourceExhausted => "source exhausted",
            SaturationStop::Cancelled => "cancelled",
        }
    }
}

/// Passed to the callback after each batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub batch: usize,
    pub fetched: usize,
    pub failed: usize,
    pub timed_out: bool,
    pub summary: BatchSummary,
    pub total_samples: usize,
    pub adjective_growth: f64,
    pub noun_growth: f64,
    pub vocabulary: VocabularyStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaturationSummary {
    pub batches: usize,
    pub samples: usize,
    pub failed_requests: usize,
    pub stop: SaturationStop,
    pub vocabulary: VocabularyStats,
}

/// New words relative to what was there before. An empty side always counts
/// as full growth.
pub fn growth_ratio(new: usize, previous: usize) -> f64 {
    if previous == 0 {
        1.0
    } else {
        new as f64 / previous as f64
    }
}

/// Fetch batches from `source` into `vocabulary` until the target sample
/// count is reached or the vocabulary stops growing.
///
/// When `checkpoint` is set the vocabulary is saved after every batch, so an
/// interrupted run keeps its progress.
pub async fn fetch_until_saturation<P>(
    source: &P,
    analyzer: &mut CorpusAnalyzer<'_>,
    vocabulary: &mut Vocabulary,
    config: &SaturationConfig,
    checkpoint: Option<&VocabularyPaths>,
    cancel: &CancellationToken,
    mut on_batch: impl FnMut(&BatchReport),
) -> Result<SaturationSummary, CoreError>
where
    P: PasswordSource,
{
    let mut batch = 0;
    let mut samples = 0;
    let mut failed_requests = 0;

    let stop = loop {
        if samples >= config.target_samples {
            break SaturationStop::TargetReached;
        }
        if batch >= config.max_batches {
            break SaturationStop::MaxBatches;
        }
        if cancel.is_cancelled() {
            break SaturationStop::Cancelled;
        }

        let size = config.batch_size.min(config.target_samples - samples);
        let Some(outcome) = cancel.run_until_cancelled(source.fetch(size)).await else {
            break SaturationStop::Cancelled;
        };

        batch += 1;
        samples += outcome.passwords.len();
        failed_requests += outcome.failed;
        if outcome.timed_out {
            tracing::warn!(batch, fetched = outcome.passwords.len(), "fetch timed out");
        }
        if outcome.passwords.is_empty() {
            break SaturationStop::SourceExhausted;
        }

        let previous = vocabulary.stats();
        let summary = analyzer.analyze_corpus(vocabulary, &outcome.passwords, AnalyzeMode::Append);
        let adjective_growth = growth_ratio(summary.new_adjectives, previous.adjectives);
        let noun_growth = growth_ratio(summary.new_nouns, previous.nouns);

        if let Some(paths) = checkpoint {
            vocabulary.save(paths)?;
        }

        let report = BatchReport {
            batch,
            fetched: outcome.passwords.len(),
            failed: outcome.failed,
            timed_out: outcome.timed_out,
            total_samples: samples,
            adjective_growth,
            noun_growth,
            vocabulary: vocabulary.stats(),
            summary,
        };
        tracing::info!(
            batch,
            samples,
            adjective_growth,
            noun_growth,
            adjectives = report.vocabulary.adjectives,
            nouns = report.vocabulary.nouns,
            "batch complete"
        );
        on_batch(&report);

        if batch > 1
            && adjective_growth < config.min_new_ratio
            && noun_growth < config.min_new_ratio
        {
            break SaturationStop::Saturated;
        }
        if batch > config.confirm_after_batches && report.summary.new_words() == 0 {
            break SaturationStop::NoGrowth;
        }
    };

    tracing::info!(batches = batch, samples, stop = stop.as_str(), "saturation loop finished");
    Ok(SaturationSummary {
        batches: batch,
        samples,
        failed_requests,
        stop,
        vocabulary: vocabulary.stats(),
    })
}
