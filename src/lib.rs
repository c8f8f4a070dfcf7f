//! # notion2latex
//!
//! Clean Notion-exported Markdown and convert it to LaTeX with pandoc.
//!
//! ## Why this crate?
//!
//! Notion's Markdown export is close to what pandoc wants, but not quite:
//! the page title is repeated as a `# ` heading on the first line, every
//! image caption appears twice (once as alt text and once as a paragraph
//! below the image), and headings styled bold arrive as `### **Title**`.
//! Fed straight to pandoc these become a duplicate chapter title, doubled
//! captions under every figure and bold section headings. This crate removes
//! those artefacts line by line, then hands the cleaned file to pandoc with a
//! template or mode of your choosing.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input.md
//!  │
//!  ├─ 1. Read       UTF-8 text, line endings folded to \n
//!  ├─ 2. Clean      drop title line, drop duplicate captions, unbold headings
//!  ├─ 3. Write      input_cleaned.md (atomic)
//!  ├─ 4. Mode       named template, standalone or fragment
//!  └─ 5. Convert    pandoc input_cleaned.md -o input.tex [--template t | --standalone]
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notion2latex::{convert, ConversionMode, PipelineConfig, TerminalPrompter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder()
//!         .work_dir("export")
//!         .input("My Page.md")
//!         .strip_heading_bold(true)
//!         .mode(ConversionMode::Standalone)
//!         .build()?;
//!     let report = convert(&config, &mut TerminalPrompter::terminal()).await?;
//!     eprintln!("removed {} duplicate captions", report.stats.captions_removed);
//!     Ok(())
//! }
//! ```
//!
//! Only the cleaning step is needed? [`pipeline::normalize::normalize`] is a
//! pure function over lines and never touches the file system.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `notion2latex` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompt;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionMode, PipelineConfig, PipelineConfigBuilder, DEFAULT_TEMPLATES};
pub use convert::{clean_to_file, convert, convert_sync, convert_with};
pub use error::{InvalidUserInput, Notion2TexError, Stage};
pub use output::{CleaningStats, PipelineReport};
pub use pipeline::invoke::{ConverterBackend, Invocation, PandocRunner};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use prompt::{Prompter, TerminalPrompter};
