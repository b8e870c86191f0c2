use std::path::{Path, PathBuf};

use crate::{Cursor, GrammarError, Result};

/// A generated file, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    lines: Vec<String>,
}

impl Artifact {
    /// Load an artifact from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(GrammarError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| GrammarError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "opened artifact");
        Ok(Self::from_text(path, &content))
    }

    /// Build an artifact from text already in memory.
    pub fn from_text(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            lines: content.lines().map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the content of a specific line (0-indexed).
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A cursor positioned at the first line.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_splits_lines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\n\nfourth\n").unwrap();

        let artifact = Artifact::open(file.path()).unwrap();
        assert_eq!(artifact.len(), 4);
        assert_eq!(artifact.line(0), Some("first"));
        assert_eq!(artifact.line(2), Some(""));
        assert_eq!(artifact.line(4), None);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::open(dir.path().join("Makefile")).unwrap_err();
        assert!(matches!(err, GrammarError::NotFound { .. }));
    }
}
