//! Error types for the notion2latex library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Notion2TexError`] — **Fatal**: the pipeline cannot continue (missing
//!   input, empty document, I/O failure, converter missing or failing).
//!   Returned as `Err(Notion2TexError)` from the top-level entry points and
//!   aborts every remaining stage.
//!
//! * [`InvalidUserInput`] — **Recoverable**: an interactive answer was not
//!   acceptable. The prompting loops in [`crate::pipeline::select`] print it
//!   and ask again; it never escapes the pipeline.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a fatal error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building and validating the configuration.
    Setup,
    /// Reading, normalising and writing the cleaned Markdown.
    Clean,
    /// Choosing the conversion mode.
    SelectMode,
    /// Running the external converter.
    Convert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Clean => "cleaning",
            Stage::SelectMode => "mode selection",
            Stage::Convert => "conversion",
        };
        f.write_str(name)
    }
}

/// All fatal errors returned by the notion2latex library.
#[derive(Debug, Error)]
pub enum Notion2TexError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// The input file exists but holds no lines at all.
    #[error("Input file is empty. Aborting.")]
    EmptyInput,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The input file could not be read (permissions, invalid UTF-8, …).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cleaned Markdown file could not be written.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The terminal could not be read from or written to while prompting.
    #[error("Prompt failed during {stage}: {source}")]
    PromptFailed {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    // ── Mode errors ───────────────────────────────────────────────────────
    /// A named template was selected but the file does not exist.
    #[error("Template file not found at '{path}'")]
    TemplateNotFound { path: PathBuf },

    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter executable is not on the execution path.
    #[error(
        "Converter '{program}' not found. Please make sure it is installed and in your PATH.\n\
Installation instructions: https://pandoc.org/installing.html"
    )]
    ConverterNotFound { program: String },

    /// The converter ran but exited unsuccessfully.
    #[error("{program} failed with {}{}", exit_label(.code), stderr_block(.stderr))]
    ConverterFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (runtime creation).
    #[error("Internal error: {0}")]
    Internal(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn stderr_block(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(".\nError output:\n{trimmed}")
    }
}

impl Notion2TexError {
    /// The stage that failed, for user-facing reporting.
    pub fn stage(&self) -> Stage {
        match self {
            Notion2TexError::InvalidConfig(_) | Notion2TexError::Internal(_) => Stage::Setup,
            Notion2TexError::InputNotFound { .. }
            | Notion2TexError::EmptyInput
            | Notion2TexError::ReadFailed { .. }
            | Notion2TexError::WriteFailed { .. } => Stage::Clean,
            Notion2TexError::PromptFailed { stage, .. } => *stage,
            Notion2TexError::TemplateNotFound { .. } => Stage::SelectMode,
            Notion2TexError::ConverterNotFound { .. }
            | Notion2TexError::ConverterFailed { .. } => Stage::Convert,
        }
    }

    /// Process exit code distinguishing each failure kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Notion2TexError::Internal(_) => 1,
            Notion2TexError::InvalidConfig(_) => 2,
            Notion2TexError::InputNotFound { .. } => 3,
            Notion2TexError::EmptyInput => 4,
            Notion2TexError::ReadFailed { .. }
            | Notion2TexError::WriteFailed { .. }
            | Notion2TexError::PromptFailed { .. } => 5,
            Notion2TexError::TemplateNotFound { .. } => 6,
            Notion2TexError::ConverterNotFound { .. } => 7,
            Notion2TexError::ConverterFailed { .. } => 8,
        }
    }
}

/// An unacceptable interactive answer. Always re-prompted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUserInput {
    /// Anything other than `y` / `n` to a yes/no question.
    #[error("Please answer 'y' or 'n' (got {answer:?}).")]
    NotYesNo { answer: String },

    /// The menu answer did not parse as an integer.
    #[error("Invalid input. Please enter a number.")]
    NotANumber { answer: String },

    /// The menu answer parsed but is not a listed option.
    #[error("Invalid number. Please enter a number between 1 and {max}.")]
    OutOfRange { choice: i64, max: usize },

    /// A named template was chosen but its file is absent.
    #[error("Error: Template file not found at '{path}'")]
    TemplateMissing { path: PathBuf },
}
