use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use dinocrack_core::{
    AnalyzeMode, CandidateGenerator, Config, CorpusAnalyzer, DigitRange, GenerationMode,
    GenerationStats, PasswordSource, Vocabulary, WordlistWriter, count_tokens,
    fetch_until_saturation,
};
use dinocrack_fetch::HttpSource;
use dinocrack_leet::{LeetCodec, VALIDATION_CASES};
use dinocrack_reporting::ReportError;

mod output;
mod settings;

use output::ColorMode;
use settings::PathOverrides;

/// Infer the DinoPass password grammar from live samples and generate a
/// matching wordlist
#[derive(Parser, Debug)]
#[command(name = "dinocrack", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./dinocrack.toml, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Adjective list
    #[arg(long, global = true)]
    adjectives: Option<PathBuf>,

    /// Noun list
    #[arg(long, global = true)]
    nouns: Option<PathBuf>,

    /// Word list used to settle ambiguous leet (default: embedded list)
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Args, Debug, Default)]
struct SourceArgs {
    /// Password endpoint
    #[arg(long)]
    url: Option<String>,

    /// Concurrent requests
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch sample passwords and add their words to the vocabulary
    Fetch {
        /// Number of passwords to fetch
        #[arg(short = 'n', long, default_value_t = 1000)]
        count: usize,

        /// Start from an empty vocabulary
        #[arg(long)]
        replace: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Analyse passwords from a file, one per line
    Analyze {
        file: PathBuf,

        /// Start from an empty vocabulary
        #[arg(long)]
        replace: bool,

        /// Re-check this many parsed records afterwards
        #[arg(long, default_value_t = 20)]
        validate: usize,
    },

    /// Fetch batches until the vocabulary stops growing
    Saturate {
        /// Total samples to fetch
        #[arg(long)]
        target: Option<usize>,

        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long)]
        max_batches: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Generate the candidate wordlist from the vocabulary
    Generate {
        /// Output wordlist
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Length preset: comprehensive (7-15) or cartesian (7-12)
        #[arg(long)]
        mode: Option<GenerationMode>,

        /// Digit suffixes, e.g. "00-99" or "7,13,42"
        #[arg(long)]
        digits: Option<DigitRange>,

        #[arg(long)]
        min_length: Option<usize>,

        #[arg(long)]
        max_length: Option<usize>,

        /// Stop after this many candidates (0 = no limit)
        #[arg(long)]
        max_results: Option<usize>,

        /// Keep duplicate candidates
        #[arg(long)]
        no_dedupe: bool,

        /// Candidates to show when done
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Check how many live samples a wordlist covers
    Coverage {
        /// Wordlist to check (default: the configured output path)
        #[arg(short, long)]
        wordlist: Option<PathBuf>,

        /// Number of live samples to fetch
        #[arg(short = 'n', long, default_value_t = 10_000)]
        samples: usize,

        /// Read samples from a file instead of fetching
        #[arg(long)]
        from_file: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run the built-in classifier and parser checks
    Selftest,

    /// Show vocabulary and wordlist sizes
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = settings::load(args.config.as_deref())?;
    settings::apply_overrides(
        &mut config,
        PathOverrides {
            adjectives: args.adjectives,
            nouns: args.nouns,
            dictionary: args.dictionary,
        },
    );

    let color = ColorMode(!args.no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());

    let cancel = CancellationToken::new();

    // Set up Ctrl+C handler
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    match args.command {
        Command::Fetch {
            count,
            replace,
            source,
        } => {
            apply_source_args(&mut config, source);
            fetch(&config, count, replace, &cancel, &mut writer, color).await
        }
        Command::Analyze {
            file,
            replace,
            validate,
        } => analyze(&config, &file, replace, validate, &mut writer, color),
        Command::Saturate {
            target,
            batch_size,
            max_batches,
            source,
        } => {
            apply_source_args(&mut config, source);
            if let Some(target) = target {
                config.saturation.target_samples = target;
            }
            if let Some(size) = batch_size {
                config.saturation.batch_size = size;
            }
            if let Some(max) = max_batches {
                config.saturation.max_batches = max;
            }
            saturate(&config, &cancel, &mut writer, color).await
        }
        Command::Generate {
            output,
            mode,
            digits,
            min_length,
            max_length,
            max_results,
            no_dedupe,
            preview,
        } => {
            let section = &mut config.generator;
            if let Some(mode) = mode {
                section.mode = mode;
            }
            if digits.is_some() {
                section.digits = digits;
            }
            if min_length.is_some() {
                section.min_length = min_length;
            }
            if max_length.is_some() {
                section.max_length = max_length;
            }
            if max_results.is_some() {
                section.max_results = max_results;
            }
            if no_dedupe {
                section.dedupe = false;
            }
            if let Some(preview) = preview {
                section.preview = preview;
            }
            if let Some(output) = output {
                config.paths.wordlist = output;
            }
            generate(&config, &cancel, &mut writer, color).await
        }
        Command::Coverage {
            wordlist,
            samples,
            from_file,
            source,
        } => {
            apply_source_args(&mut config, source);
            if let Some(wordlist) = wordlist {
                config.paths.wordlist = wordlist;
            }
            coverage(
                &config,
                samples,
                from_file.as_deref(),
                &cancel,
                &mut writer,
                color,
            )
            .await
        }
        Command::Selftest => selftest(&mut writer, color),
        Command::Stats => stats(&config, &mut writer, color),
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "dinocrack=debug"
    } else {
        "dinocrack=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_source_args(config: &mut Config, source: SourceArgs) {
    if let Some(url) = source.url {
        config.fetch.url = url;
    }
    if let Some(workers) = source.workers {
        config.fetch.workers = workers;
    }
}

fn load_vocabulary(config: &Config, replace: bool) -> anyhow::Result<Vocabulary> {
    if replace {
        return Ok(Vocabulary::new());
    }
    Vocabulary::load_or_default(&config.paths.vocabulary()).context("loading vocabulary")
}

async fn fetch(
    config: &Config,
    count: usize,
    replace: bool,
    cancel: &CancellationToken,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let codec = LeetCodec::dinopass();
    let dictionary = settings::load_dictionary(config)?;
    let mut vocabulary = load_vocabulary(config, replace)?;
    let source = HttpSource::new(&config.fetch)?;

    let spinner = output::spinner(format!("Fetching {count} passwords from {}", source.url()));
    let Some(outcome) = cancel.run_until_cancelled(source.fetch(count)).await else {
        spinner.abandon_with_message("interrupted");
        anyhow::bail!("interrupted before any password was analysed");
    };
    spinner.finish_and_clear();
    output::print_fetch_outcome(writer, &outcome, color)?;

    let mode = if replace {
        AnalyzeMode::Replace
    } else {
        AnalyzeMode::Append
    };
    let mut analyzer = CorpusAnalyzer::new(&codec).with_dictionary(&dictionary);
    let summary = analyzer.analyze_corpus(&mut vocabulary, &outcome.passwords, mode);
    vocabulary
        .save(&config.paths.vocabulary())
        .context("saving vocabulary")?;

    output::print_batch_summary(writer, &summary, vocabulary.stats(), color)?;
    Ok(ExitCode::SUCCESS)
}

fn analyze(
    config: &Config,
    file: &Path,
    replace: bool,
    validate: usize,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading passwords from {}", file.display()))?;
    let passwords: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let codec = LeetCodec::dinopass();
    let dictionary = settings::load_dictionary(config)?;
    let mut vocabulary = load_vocabulary(config, replace)?;
    let mode = if replace {
        AnalyzeMode::Replace
    } else {
        AnalyzeMode::Append
    };

    let mut analyzer = CorpusAnalyzer::new(&codec).with_dictionary(&dictionary);
    let summary = analyzer.analyze_corpus(&mut vocabulary, &passwords, mode);
    vocabulary
        .save(&config.paths.vocabulary())
        .context("saving vocabulary")?;

    output::print_batch_summary(writer, &summary, vocabulary.stats(), color)?;
    let checked = validate.min(analyzer.log().len());
    output::print_mismatches(writer, checked, &analyzer.validate_patterns(validate), color)?;
    Ok(ExitCode::SUCCESS)
}

async fn saturate(
    config: &Config,
    cancel: &CancellationToken,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let codec = LeetCodec::dinopass();
    let dictionary = settings::load_dictionary(config)?;
    let paths = config.paths.vocabulary();
    let mut vocabulary = load_vocabulary(config, false)?;
    let source = HttpSource::new(&config.fetch)?;
    let mut analyzer = CorpusAnalyzer::new(&codec).with_dictionary(&dictionary);

    let pb = output::progress_bar(config.saturation.target_samples as u64, "samples");
    let summary = fetch_until_saturation(
        &source,
        &mut analyzer,
        &mut vocabulary,
        &config.saturation,
        Some(&paths),
        cancel,
        |report| {
            pb.set_position(report.total_samples as u64);
            pb.set_message(format!(
                "batch {}: +{} adj, +{} nouns",
                report.batch, report.summary.new_adjectives, report.summary.new_nouns
            ));
        },
    )
    .await?;
    pb.finish_and_clear();

    output::print_saturation_summary(writer, &summary, color)?;
    Ok(ExitCode::SUCCESS)
}

async fn generate(
    config: &Config,
    cancel: &CancellationToken,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let paths = config.paths.vocabulary();
    let vocabulary = match Vocabulary::load(&paths) {
        Ok(vocabulary) => vocabulary,
        Err(e) if e.is_missing_vocabulary() => {
            anyhow::bail!("{e}. Run `dinocrack fetch` or `dinocrack saturate` first.")
        }
        Err(e) => return Err(e).context("loading vocabulary"),
    };
    // Checked before the output file is opened so an old wordlist survives
    if !vocabulary.is_usable() {
        let stats = vocabulary.stats();
        anyhow::bail!(
            "vocabulary is empty ({} adjectives, {} nouns), {} left untouched",
            stats.adjectives,
            stats.nouns,
            config.paths.wordlist.display()
        );
    }
    let gen_config = config.generator.to_builder().build()?;

    let codec = LeetCodec::dinopass();
    let estimate = CandidateGenerator::new(&codec, &gen_config).estimate(&vocabulary);
    output::print_generation_plan(writer, vocabulary.stats(), estimate, &gen_config, color)?;
    writer.flush()?;

    let output_path = config.paths.wordlist.clone();
    let pb = output::progress_bar(vocabulary.adjectives().len() as u64, "adjectives");
    let task_pb = pb.clone();
    let task_cancel = cancel.clone();
    let task_path = output_path.clone();

    // Generation is CPU-bound; keep it off the async workers
    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<GenerationStats> {
        let codec = LeetCodec::dinopass();
        let mut wordlist = WordlistWriter::create(&task_path)?;
        let stats = CandidateGenerator::new(&codec, &gen_config).generate(
            &vocabulary,
            &mut wordlist,
            &task_cancel,
            |progress| {
                task_pb.set_position(progress.adjectives_done as u64);
                task_pb.set_message(format!("{} written", progress.written));
            },
        )?;
        wordlist
            .finish()
            .with_context(|| format!("flushing {}", task_path.display()))?;
        Ok(stats)
    })
    .await
    .context("generation task failed")??;
    pb.finish_and_clear();

    output::print_generation_stats(writer, &stats, &output_path, color)?;
    Ok(ExitCode::SUCCESS)
}

async fn coverage(
    config: &Config,
    samples: usize,
    from_file: Option<&Path>,
    cancel: &CancellationToken,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    let wordlist = dinocrack_reporting::load_wordlist(&config.paths.wordlist)?;
    writeln!(
        writer,
        "Loaded {} candidates from {}",
        wordlist.len(),
        config.paths.wordlist.display()
    )?;

    let passwords: Vec<String> = match from_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading samples from {}", path.display()))?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect(),
        None => {
            let source = HttpSource::new(&config.fetch)?;
            let spinner =
                output::spinner(format!("Fetching {samples} samples from {}", source.url()));
            let Some(outcome) = cancel.run_until_cancelled(source.fetch(samples)).await else {
                spinner.abandon_with_message("interrupted");
                anyhow::bail!("interrupted while fetching samples");
            };
            spinner.finish_and_clear();
            output::print_fetch_outcome(writer, &outcome, color)?;
            outcome.passwords
        }
    };

    let codec = LeetCodec::dinopass();
    let report = dinocrack_reporting::check_coverage(&codec, &wordlist, &passwords);
    output::print_coverage_report(writer, &report, color)?;
    let validity = dinocrack_reporting::validity_summary(&codec, &passwords);
    output::print_validity_summary(writer, &validity, color)?;

    if report.is_passing() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Passwords whose split and deleet are known.
const ROUND_TRIP_CASES: &[(&str, (&str, &str))] = &[
    ("wildLion42", ("wild", "lion")),
    ("br@veEagle07", ("brave", "eagle")),
    ("]adeTiger13", ("jade", "tiger")),
    ("wild+iger99", ("wild", "tiger")),
    ("calmOtt3r00", ("calm", "otter")),
];

fn selftest(writer: &mut dyn Write, color: ColorMode) -> anyhow::Result<ExitCode> {
    let codec = LeetCodec::dinopass();
    let mut failures = 0;

    writeln!(writer, "Leet classification:")?;
    for case in VALIDATION_CASES {
        let actual = codec.is_valid_leet_combination(case.password);
        if actual != case.expected {
            failures += 1;
        }
        output::print_selftest_case(writer, case, actual, color)?;
    }

    writeln!(writer)?;
    writeln!(writer, "Split and deleet:")?;
    let analyzer = CorpusAnalyzer::new(&codec);
    for &(password, expected) in ROUND_TRIP_CASES {
        let recovered = analyzer
            .analyze_password(password)
            .map(|r| (r.adjective, r.noun))
            .map_err(|e| e.to_string());
        if !output::print_round_trip(writer, password, recovered, expected, color)? {
            failures += 1;
        }
    }

    writeln!(writer)?;
    if failures == 0 {
        writeln!(writer, "All checks passed.")?;
        Ok(ExitCode::SUCCESS)
    } else {
        writeln!(writer, "{failures} check(s) failed.")?;
        Ok(ExitCode::FAILURE)
    }
}

fn stats(
    config: &Config,
    writer: &mut dyn Write,
    color: ColorMode,
) -> anyhow::Result<ExitCode> {
    writeln!(writer, "Vocabulary:")?;
    let paths = config.paths.vocabulary();
    output::print_vocabulary_counts(
        writer,
        "adjectives",
        &paths.adjectives,
        count_tokens(&paths.adjectives)?,
        color,
    )?;
    output::print_vocabulary_counts(
        writer,
        "nouns",
        &paths.nouns,
        count_tokens(&paths.nouns)?,
        color,
    )?;
    let wordlist = match dinocrack_reporting::load_wordlist(&config.paths.wordlist) {
        Ok(words) => Some(words.len()),
        Err(ReportError::MissingWordlist(_)) => None,
        Err(e) => return Err(e.into()),
    };
    output::print_vocabulary_counts(writer, "wordlist", &config.paths.wordlist, wordlist, color)?;
    Ok(ExitCode::SUCCESS)
}
