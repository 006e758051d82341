//! Flat-file persistence for vocabulary lists.
//!
//! One lowercase token per line, no header. Blank lines are skipped on load.
//! Writes go through a temp file in the target directory and are renamed into
//! place, so a crash never leaves a half-written list.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CoreError;
use crate::vocabulary::Vocabulary;

/// Locations of the adjective and noun lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyPaths {
    pub adjectives: PathBuf,
    pub nouns: PathBuf,
}

impl VocabularyPaths {
    pub fn new(adjectives: impl Into<PathBuf>, nouns: impl Into<PathBuf>) -> Self {
        Self {
            adjectives: adjectives.into(),
            nouns: nouns.into(),
        }
    }

    pub fn exist(&self) -> bool {
        self.adjectives.exists() && self.nouns.exists()
    }
}

/// Read a token list. A missing file is reported as
/// [`CoreError::MissingVocabulary`].
pub fn load_tokens(path: &Path) -> Result<BTreeSet<String>, CoreError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CoreError::MissingVocabulary(path.to_path_buf()),
        _ => CoreError::io(path, e),
    })?;

    let mut tokens = BTreeSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| CoreError::io(path, e))?;
        let token = line.trim();
        if !token.is_empty() {
            tokens.insert(token.to_lowercase());
        }
    }
    Ok(tokens)
}

/// Atomically replace `path` with the given tokens, one per line.
pub fn save_tokens<'a, I>(path: &Path, tokens: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a String>,
{
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;

    let temp_file = NamedTempFile::new_in(parent).map_err(|e| CoreError::io(parent, e))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        for token in tokens {
            writeln!(writer, "{token}").map_err(|e| CoreError::io(path, e))?;
        }
        writer.flush().map_err(|e| CoreError::io(path, e))?;
    }
    temp_file
        .persist(path)
        .map_err(|e| CoreError::io(path, e.error))?;
    Ok(())
}

/// Count non-blank lines, or `None` if the file does not exist.
pub fn count_tokens(path: &Path) -> Result<Option<usize>, CoreError> {
    match load_tokens(path) {
        Ok(tokens) => Ok(Some(tokens.len())),
        Err(CoreError::MissingVocabulary(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Vocabulary {
    pub fn load(paths: &VocabularyPaths) -> Result<Self, CoreError> {
        let adjectives = load_tokens(&paths.adjectives)?;
        let nouns = load_tokens(&paths.nouns)?;
        tracing::info!(
            adjectives = adjectives.len(),
            nouns = nouns.len(),
            "loaded vocabulary"
        );
        Ok(Self::from_sets(adjectives, nouns))
    }

    /// Load if both files exist, otherwise start empty.
    pub fn load_or_default(paths: &VocabularyPaths) -> Result<Self, CoreError> {
        match Self::load(paths) {
            Ok(vocabulary) => Ok(vocabulary),
            Err(CoreError::MissingVocabulary(path)) => {
                tracing::info!(path = %path.display(), "no vocabulary on disk, starting fresh");
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, paths: &VocabularyPaths) -> Result<(), CoreError> {
        save_tokens(&paths.adjectives, self.adjectives())?;
        save_tokens(&paths.nouns, self.nouns())?;
        tracing::debug!(
            adjectives = self.adjectives().len(),
            nouns = self.nouns().len(),
            "saved vocabulary"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VocabularyPaths::new(dir.path().join("adj.txt"), dir.path().join("nouns.txt"));

        let vocab = Vocabulary::from_words(["wild", "brave"], ["lion"]);
        vocab.save(&paths).unwrap();

        let adjectives = std::fs::read_to_string(&paths.adjectives).unwrap();
        assert_eq!(adjectives, "brave\nwild\n");
        assert_eq!(Vocabulary::load(&paths).unwrap(), vocab);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adj.txt");
        std::fs::write(&path, "wild\n\n   \n Brave \nwild\n").unwrap();

        let tokens = load_tokens(&path).unwrap();
        assert_eq!(tokens.into_iter().collect::<Vec<_>>(), vec!["brave", "wild"]);
        assert_eq!(count_tokens(&path).unwrap(), Some(2));
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VocabularyPaths::new(dir.path().join("a.txt"), dir.path().join("n.txt"));

        let err = Vocabulary::load(&paths).unwrap_err();
        assert!(err.is_missing_vocabulary());
        assert!(!paths.exist());
        assert_eq!(count_tokens(&paths.nouns).unwrap(), None);
        assert!(Vocabulary::load_or_default(&paths).unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("nouns.txt");
        let tokens: BTreeSet<String> = ["lion".to_string()].into();
        save_tokens(&path, &tokens).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "lion\n");
    }
}
