use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use dinocrack_core::{
    BatchSummary, FetchOutcome, GenerationStats, GeneratorConfig, PatternMismatch,
    SaturationSummary, StopReason, VocabularyStats,
};
use dinocrack_leet::ValidationCase;
use dinocrack_reporting::{CoverageReport, CoverageVerdict, MissCategory, ValiditySummary};

/// Whether to emit ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(self) -> bool {
        self.0
    }
}

fn bold(text: impl Display, color: ColorMode) -> String {
    if color.enabled() {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn green(text: impl Display, color: ColorMode) -> String {
    if color.enabled() {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

fn yellow(text: impl Display, color: ColorMode) -> String {
    if color.enabled() {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

fn red(text: impl Display, color: ColorMode) -> String {
    if color.enabled() {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: impl Display, color: ColorMode) -> String {
    if color.enabled() {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", bold(title, color))?;
    writeln!(w, "{}", dim("─".repeat(60), color))
}

/// Bar over a known amount of work, drawn on stderr.
pub fn progress_bar(len: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!("{{elapsed_precise}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} {{msg}}");
    if let Ok(style) = ProgressStyle::with_template(&template) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn print_fetch_outcome(
    w: &mut dyn Write,
    outcome: &FetchOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    write!(w, "Fetched {} passwords", bold(outcome.passwords.len(), color))?;
    if outcome.failed > 0 {
        write!(w, ", {}", yellow(format!("{} failed", outcome.failed), color))?;
    }
    if outcome.timed_out {
        write!(w, ", {}", yellow("collection timed out", color))?;
    }
    writeln!(w)
}

pub fn print_batch_summary(
    w: &mut dyn Write,
    summary: &BatchSummary,
    vocabulary: VocabularyStats,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Analysis", color)?;
    writeln!(w, "  Parsed:            {}/{}", summary.successful, summary.total)?;
    if summary.failed > 0 {
        writeln!(w, "  Failed:            {}", yellow(summary.failed, color))?;
    }
    writeln!(w, "  New adjectives:    {}", green(summary.new_adjectives, color))?;
    writeln!(w, "  New nouns:         {}", green(summary.new_nouns, color))?;
    if summary.ambiguous_fallbacks > 0 {
        writeln!(
            w,
            "  Ambiguous guesses: {}",
            yellow(summary.ambiguous_fallbacks, color)
        )?;
    }
    writeln!(
        w,
        "  Vocabulary:        {} adjectives, {} nouns",
        bold(vocabulary.adjectives, color),
        bold(vocabulary.nouns, color)
    )?;

    if !summary.failed_examples.is_empty() {
        writeln!(w, "  {}", dim("Failed examples:", color))?;
        for (password, failure) in &summary.failed_examples {
            writeln!(w, "    {password:20} {}", dim(failure, color))?;
        }
    }
    Ok(())
}

pub fn print_mismatches(
    w: &mut dyn Write,
    checked: usize,
    mismatches: &[PatternMismatch],
    color: ColorMode,
) -> std::io::Result<()> {
    if checked == 0 {
        return Ok(());
    }
    if mismatches.is_empty() {
        writeln!(
            w,
            "{}",
            green(format!("Validated {checked} records, no mismatches"), color)
        )?;
        return Ok(());
    }

    heading(w, "Potential mismatches", color)?;
    for m in mismatches {
        writeln!(
            w,
            "  {:20} {} vs {}",
            m.original,
            yellow(&m.deleeted, color),
            m.expected
        )?;
    }
    Ok(())
}

pub fn print_saturation_summary(
    w: &mut dyn Write,
    summary: &SaturationSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Saturation", color)?;
    writeln!(w, "  Batches:         {}", summary.batches)?;
    writeln!(w, "  Samples:         {}", summary.samples)?;
    if summary.failed_requests > 0 {
        writeln!(w, "  Failed requests: {}", yellow(summary.failed_requests, color))?;
    }
    writeln!(w, "  Stopped:         {}", bold(summary.stop.as_str(), color))?;
    writeln!(
        w,
        "  Vocabulary:      {} adjectives, {} nouns",
        bold(summary.vocabulary.adjectives, color),
        bold(summary.vocabulary.nouns, color)
    )
}

pub fn print_generation_plan(
    w: &mut dyn Write,
    vocabulary: VocabularyStats,
    estimate: u64,
    config: &GeneratorConfig,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Generation", color)?;
    writeln!(
        w,
        "  Vocabulary:  {} adjectives × {} nouns",
        vocabulary.adjectives, vocabulary.nouns
    )?;
    writeln!(w, "  Suffixes:    {} ({} values)", config.digits, config.digits.len())?;
    writeln!(w, "  Length:      {}–{}", config.min_length, config.max_length)?;
    if let Some(max) = config.max_results {
        writeln!(w, "  Limit:       {max}")?;
    }
    writeln!(w, "  Estimate:    {} before filtering", bold(estimate, color))
}

pub fn print_generation_stats(
    w: &mut dyn Write,
    stats: &GenerationStats,
    path: &std::path::Path,
    color: ColorMode,
) -> std::io::Result<()> {
    if !stats.preview.is_empty() {
        heading(w, "Preview", color)?;
        for (i, (combination, candidate)) in stats.preview.iter().enumerate() {
            writeln!(
                w,
                "  {:3}. {:20} {}",
                i + 1,
                candidate,
                dim(combination.label(), color)
            )?;
        }
    }

    heading(w, "Result", color)?;
    writeln!(w, "  Written:          {}", green(stats.written, color))?;
    writeln!(w, "  Rejected length:  {}", stats.rejected_length)?;
    writeln!(w, "  Rejected invalid: {}", stats.rejected_invalid)?;
    writeln!(w, "  Duplicates:       {}", stats.duplicates)?;
    match stats.stop {
        StopReason::Exhausted => {}
        StopReason::LimitReached => writeln!(w, "  {}", yellow("Stopped at result limit", color))?,
        StopReason::Cancelled => writeln!(
            w,
            "  {}",
            yellow("Interrupted; the wordlist holds everything written so far", color)
        )?,
        StopReason::EmptyVocabulary => writeln!(
            w,
            "  {}",
            red("Vocabulary is empty; fetch samples first", color)
        )?,
    }
    writeln!(w, "  Output:           {}", path.display())
}

pub fn print_coverage_report(
    w: &mut dyn Write,
    report: &CoverageReport,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, "Coverage", color)?;
    writeln!(w, "  Samples:          {}", report.total)?;
    writeln!(w, "  Found:            {}", green(report.matches, color))?;
    writeln!(w, "  Missing:          {}", report.misses)?;

    let pct = format!("{:.2}%", report.coverage_pct);
    let verdict = report.verdict();
    let painted = match verdict {
        CoverageVerdict::Excellent | CoverageVerdict::Good => green(&pct, color),
        CoverageVerdict::Moderate => yellow(&pct, color),
        CoverageVerdict::Low => red(&pct, color),
    };
    writeln!(w, "  Coverage:         {painted}  {}", dim(verdict.description(), color))?;

    if !report.categories.is_empty() {
        writeln!(w, "  {}", dim("Why samples were missed:", color))?;
        for category in MissCategory::ALL {
            if let Some(count) = report.categories.get(&category) {
                writeln!(w, "    {:32} {count}", category.description())?;
            }
        }
    }

    if !report.missing.is_empty() {
        writeln!(w, "  {}", dim("First missing samples:", color))?;
        for (i, password) in report.missing.iter().take(20).enumerate() {
            writeln!(w, "    {:2}. {password}", i + 1)?;
        }
        if report.missing.len() > 20 {
            writeln!(w, "    ... and {} more", report.misses - 20)?;
        }
    }
    Ok(())
}

pub fn print_validity_summary(
    w: &mut dyn Write,
    summary: &ValiditySummary,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(
        w,
        "  Single-class leet: {}/{} samples ({:.1}%)",
        summary.valid,
        summary.total,
        summary.valid_fraction() * 100.0
    )?;
    for example in &summary.invalid_examples {
        writeln!(w, "    {}", dim(example, color))?;
    }
    Ok(())
}

pub fn print_selftest_case(
    w: &mut dyn Write,
    case: &ValidationCase,
    actual: bool,
    color: ColorMode,
) -> std::io::Result<()> {
    let mark = if actual == case.expected {
        green("PASS", color)
    } else {
        red("FAIL", color)
    };
    writeln!(
        w,
        "  {mark} {:14} -> {:5} (expected {:5}) {}",
        case.password,
        actual,
        case.expected,
        dim(case.description, color)
    )
}

pub fn print_round_trip(
    w: &mut dyn Write,
    password: &str,
    recovered: Result<(String, String), String>,
    expected: (&str, &str),
    color: ColorMode,
) -> std::io::Result<bool> {
    let (ok, detail) = match &recovered {
        Ok((adj, noun)) => (
            (adj.as_str(), noun.as_str()) == expected,
            format!("{adj} + {noun}"),
        ),
        Err(e) => (false, e.clone()),
    };
    let mark = if ok { green("PASS", color) } else { red("FAIL", color) };
    writeln!(w, "  {mark} {password:14} -> {detail}")?;
    Ok(ok)
}

pub fn print_vocabulary_counts(
    w: &mut dyn Write,
    label: &str,
    path: &std::path::Path,
    count: Option<usize>,
    color: ColorMode,
) -> std::io::Result<()> {
    // Pad before styling; escape codes would count toward the width
    let value = match count {
        Some(n) => bold(format!("{n:>8}"), color),
        None => yellow(format!("{:>8}", "missing"), color),
    };
    writeln!(w, "  {label:12} {value}  {}", dim(path.display(), color))
}
