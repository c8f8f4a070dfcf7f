//! Interactive prompting seam.
//!
//! The pipeline never touches stdin or stdout directly. It asks questions
//! through a [`Prompter`], so the validation loops in
//! [`crate::pipeline::select`] can be driven by a scripted reader in tests
//! and by the terminal in the CLI.

use std::io::{self, BufRead, Write};

/// Asks the user a question and returns the raw answer line.
pub trait Prompter {
    /// Show `question` and read one answer.
    ///
    /// Returns `Ok(None)` when the input is closed (end of file); callers
    /// treat that as fatal rather than re-prompting forever.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    /// Show an informational line (menus, validation messages).
    fn say(&mut self, message: &str) -> io::Result<()>;
}

/// A [`Prompter`] over any line reader and writer.
///
/// [`TerminalPrompter::terminal`] wires it to the process terminal; tests
/// wrap a `Cursor` and a `Vec<u8>`.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompter, returning the writer (to inspect what was shown).
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Answers from stdin, questions on stderr (stdout stays free for output).
    pub fn terminal() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(answer))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{message}")
    }
}
