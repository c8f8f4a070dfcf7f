//! Result types returned by the pipeline entry points.

use crate::config::ConversionMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the normaliser changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Lines in the source document.
    pub input_lines: usize,
    /// Lines in the cleaned document.
    pub output_lines: usize,
    /// Whether a leading `# ` title line was dropped.
    pub title_removed: bool,
    /// Duplicate caption lines removed after image references.
    pub captions_removed: usize,
    /// Heading lines whose leading bold span was stripped.
    pub headings_unbolded: usize,
}

/// Summary of a complete pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Source Markdown file.
    pub input: PathBuf,
    /// Cleaned Markdown file written by the normaliser.
    pub cleaned: PathBuf,
    /// LaTeX file written by the converter; `None` for clean-only runs.
    pub output: Option<PathBuf>,
    /// Mode the converter ran in; `None` for clean-only runs.
    pub mode: Option<ConversionMode>,
    /// Normaliser statistics.
    pub stats: CleaningStats,
    /// Wall-clock time spent reading, cleaning and writing.
    pub clean_duration_ms: u64,
    /// Wall-clock time spent in the converter.
    pub convert_duration_ms: u64,
}

impl PipelineReport {
    /// `true` when the converter ran and produced output.
    pub fn converted(&self) -> bool {
        self.output.is_some()
    }
}
