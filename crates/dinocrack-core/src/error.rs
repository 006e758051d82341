use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A vocabulary file does not exist yet. Callers usually fetch fresh
    /// samples instead of aborting.
    #[error("vocabulary file not found: {}", .0.display())]
    MissingVocabulary(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write candidate: {0}")]
    Sink(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for conditions the caller can recover from by fetching data.
    pub fn is_missing_vocabulary(&self) -> bool {
        matches!(self, CoreError::MissingVocabulary(_))
    }
}
