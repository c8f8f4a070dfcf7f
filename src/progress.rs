//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves from cleaning to mode selection to
//! conversion. The CLI uses it to print step headers and to run a spinner
//! while the converter works; library callers can forward the same events to
//! whatever they like.
//!
//! # Example
//!
//! ```rust
//! use notion2latex::{CleaningStats, PipelineConfig, PipelineProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CaptionCounter {
//!     removed: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CaptionCounter {
//!     fn on_clean_complete(&self, _cleaned: &Path, stats: &CleaningStats) {
//!         self.removed.store(stats.captions_removed, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CaptionCounter { removed: AtomicUsize::new(0) });
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(counter as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::ConversionMode;
use crate::output::CleaningStats;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline at each stage boundary.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is sequential; events arrive in stage
/// order from a single task.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once the input has been read, before any prompting.
    ///
    /// # Arguments
    /// * `input` — the source Markdown file
    /// * `lines` — number of lines read
    fn on_clean_start(&self, input: &Path, lines: usize) {
        let _ = (input, lines);
    }

    /// Called after the cleaned Markdown has been written.
    fn on_clean_complete(&self, cleaned: &Path, stats: &CleaningStats) {
        let _ = (cleaned, stats);
    }

    /// Called once the conversion mode is known.
    fn on_mode_selected(&self, mode: &ConversionMode) {
        let _ = mode;
    }

    /// Called just before the converter is spawned.
    ///
    /// # Arguments
    /// * `program` — the converter executable, as configured
    /// * `command` — the full command line, shell-quoted for display
    fn on_convert_start(&self, program: &str, command: &str) {
        let _ = (program, command);
    }

    /// Called when the converter exits successfully.
    fn on_convert_complete(&self, output: &Path) {
        let _ = output;
    }

    /// Called when the converter is missing or exits unsuccessfully.
    fn on_convert_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
