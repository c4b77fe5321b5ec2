pub mod suggest;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// BIP-39 English list, one word per line
const BUNDLED_ENGLISH: &str = include_str!("../../assets/english.txt");

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("failed to read word list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the reference word list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListSource {
    Bundled,
    Path(PathBuf),
}

impl WordListSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => WordListSource::Path(p),
            None => WordListSource::Bundled,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WordListSource::Bundled => "bundled BIP-39 English".to_string(),
            WordListSource::Path(p) => p.display().to_string(),
        }
    }
}

/// Reference word list. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,    // List order, used for suggestions
    index: HashSet<String>,
}

impl WordList {
    /// Parse newline-delimited text: trims each line, drops blanks, lowercases
    pub fn parse(text: &str) -> Self {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        let index = words.iter().cloned().collect();
        Self { words, index }
    }

    pub fn bundled() -> Self {
        Self::parse(BUNDLED_ENGLISH)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Case-insensitive membership
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(&word.to_lowercase())
    }
}

/// Read a word list from disk
pub async fn load(path: &Path) -> Result<WordList, WordListError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| WordListError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(WordList::parse(&text))
}

/// Resolve a source into a list. Never fails: a read error is logged and
/// yields an empty list, which makes every word pass validation.
pub async fn load_source(source: &WordListSource) -> WordList {
    match source {
        WordListSource::Bundled => WordList::bundled(),
        WordListSource::Path(path) => match load(path).await {
            Ok(list) => {
                tracing::info!("Loaded {} words from {}", list.len(), path.display());
                list
            }
            Err(e) => {
                tracing::error!("Failed to load word list: {}", e);
                WordList::default()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let list = WordList::parse("abandon\r\n\r\n  ability \nable\n\n");
        assert_eq!(list.words(), &["abandon", "ability", "able"]);
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let list = WordList::parse("Abandon\nability\n");
        assert!(list.contains("abandon"));
        assert!(list.contains("ABILITY"));
        assert!(!list.contains("abandonment"));
    }

    #[test]
    fn test_bundled_list_is_bip39_english() {
        let list = WordList::bundled();
        assert_eq!(list.len(), 2048);
        assert_eq!(list.words().first().map(String::as_str), Some("abandon"));
        assert_eq!(list.words().last().map(String::as_str), Some("zoo"));
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha\nbravo\n\ncharlie").unwrap();

        let list = load(file.path()).await.unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.contains("bravo"));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load(&dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, WordListError::Read { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[tokio::test]
    async fn test_load_source_swallows_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = WordListSource::Path(dir.path().join("nope.txt"));
        let list = load_source(&source).await;
        assert!(list.is_empty());
    }
}
