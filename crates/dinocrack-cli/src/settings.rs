//! Configuration precedence: CLI flags > environment variables > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;

use dinocrack_core::Config;
use dinocrack_dict::WordListDictionary;

/// Looked up in the working directory when `--config` is not given.
pub const LOCAL_CONFIG_FILE: &str = "dinocrack.toml";

/// First config file that applies: the explicit path, `./dinocrack.toml`,
/// then `<config dir>/dinocrack/config.toml`.
pub fn discover_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("dinocrack").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load the config file (if any) and layer environment variables on top.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match discover_config(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            Config::load(&path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply `DINOCRACK_*` variables read through `var`.
pub fn apply_env(
    config: &mut Config,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(url) = var("DINOCRACK_URL") {
        config.fetch.url = url;
    }
    if let Some(workers) = var("DINOCRACK_WORKERS") {
        config.fetch.workers = workers
            .trim()
            .parse()
            .with_context(|| format!("DINOCRACK_WORKERS={workers:?} is not a number"))?;
    }
    if let Some(path) = var("DINOCRACK_DICTIONARY") {
        config.paths.dictionary = Some(PathBuf::from(path));
    }
    if let Some(path) = var("DINOCRACK_ADJECTIVES") {
        config.paths.adjectives = PathBuf::from(path);
    }
    if let Some(path) = var("DINOCRACK_NOUNS") {
        config.paths.nouns = PathBuf::from(path);
    }
    Ok(())
}

/// Global path flags; each one that is set wins over everything else.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub adjectives: Option<PathBuf>,
    pub nouns: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
}

pub fn apply_overrides(config: &mut Config, overrides: PathOverrides) {
    if let Some(path) = overrides.adjectives {
        config.paths.adjectives = path;
    }
    if let Some(path) = overrides.nouns {
        config.paths.nouns = path;
    }
    if let Some(path) = overrides.dictionary {
        config.paths.dictionary = Some(path);
    }
}

/// Load the configured dictionary, or the embedded word list.
pub fn load_dictionary(config: &Config) -> anyhow::Result<WordListDictionary> {
    match &config.paths.dictionary {
        Some(path) => WordListDictionary::from_file(path)
            .with_context(|| format!("loading dictionary {}", path.display())),
        None => Ok(WordListDictionary::embedded()),
    }
}
