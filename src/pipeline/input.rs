//! Input stage: read the exported Markdown into an ordered list of lines.
//!
//! Lines keep their `\n` terminator so the cleaned file can be written back
//! by plain concatenation. Windows (`\r\n`) and old Mac (`\r`) endings are
//! folded to `\n` on read, so the normaliser only ever sees one terminator.

use crate::error::Notion2TexError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The source document, owned, with line endings normalised.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Wrap already-loaded text (line endings are normalised).
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            text: normalise_line_endings(text),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines in order, each including its trailing `\n` if it had one.
    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Read `path` as UTF-8 text.
///
/// # Errors
/// * [`Notion2TexError::InputNotFound`] — no file at `path`
/// * [`Notion2TexError::ReadFailed`] — cannot be inspected, unreadable or
///   not valid UTF-8
/// * [`Notion2TexError::EmptyInput`] — the file has zero lines
pub async fn read_document(path: &Path) -> Result<Document, Notion2TexError> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(Notion2TexError::InputNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(Notion2TexError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Notion2TexError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let doc = Document::from_text(path, &text);
    if doc.is_empty() {
        return Err(Notion2TexError::EmptyInput);
    }

    debug!("Read {} lines from {}", doc.lines().len(), path.display());
    Ok(doc)
}

/// Split text into lines, keeping each line's `\n`.
///
/// The final line has no terminator when the text does not end with one.
/// Empty text yields no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_terminators() {
        assert_eq!(split_lines("a\n\nb"), vec!["a\n", "\n", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn line_endings_normalised() {
        let doc = Document::from_text("x.md", "a\r\nb\rc\n");
        assert_eq!(doc.lines(), vec!["a\n", "b\n", "c\n"]);
    }

    #[test]
    fn single_newline_is_one_blank_line() {
        let doc = Document::from_text("x.md", "\n");
        assert!(!doc.is_empty());
        assert_eq!(doc.lines(), vec!["\n"]);
    }

    #[tokio::test]
    async fn missing_file_is_input_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_document(&dir.path().join("nope.md")).await.unwrap_err();
        assert!(matches!(err, Notion2TexError::InputNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stat_failure_is_read_failure_not_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("plain.md");
        std::fs::write(&file, "x\n").unwrap();
        // A regular file used as a directory: stat fails with ENOTDIR.
        let err = read_document(&file.join("child.md")).await.unwrap_err();
        assert!(matches!(err, Notion2TexError::ReadFailed { .. }), "got {err:?}");
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn zero_byte_file_is_empty_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.md");
        std::fs::write(&path, "").unwrap();
        let err = read_document(&path).await.unwrap_err();
        assert!(matches!(err, Notion2TexError::EmptyInput));
    }

    #[tokio::test]
    async fn invalid_utf8_is_read_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latin1.md");
        std::fs::write(&path, [0x66, 0x6f, 0xff, 0x0a]).unwrap();
        let err = read_document(&path).await.unwrap_err();
        assert!(matches!(err, Notion2TexError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn reads_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Title\nBody\n").unwrap();
        let doc = read_document(&path).await.unwrap();
        assert_eq!(doc.path(), path.as_path());
        assert_eq!(doc.lines(), vec!["# Title\n", "Body\n"]);
    }
}
