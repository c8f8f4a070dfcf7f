//! Pipeline stages for Notion-Markdown-to-LaTeX conversion.
//!
//! Each submodule implements exactly one step. Only [`input`] and
//! [`invoke`] touch the outside world; [`normalize`] is pure and
//! [`select`] talks to the user only through [`crate::prompt::Prompter`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ select ──▶ invoke
//! (read)    (clean)       (mode)     (pandoc)
//! ```
//!
//! 1. [`input`]     — read the export, fold line endings, split into lines
//! 2. [`normalize`] — drop the title line and duplicate captions, optionally
//!    unbold headings
//! 3. [`select`]    — ask the yes/no and menu questions, validate answers
//! 4. [`invoke`]    — build the converter command line and run it

pub mod input;
pub mod invoke;
pub mod normalize;
pub mod select;
