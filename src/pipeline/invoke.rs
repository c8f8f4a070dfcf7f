//! Converter invocation: turn a mode into a pandoc command and run it.
//!
//! The command line is built by [`Invocation`] and executed by a
//! [`ConverterBackend`]. [`PandocRunner`] spawns the real process; tests
//! substitute a backend that records invocations instead, so nothing here
//! needs pandoc installed to be exercised.

use crate::config::ConversionMode;
use crate::error::Notion2TexError;
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A fully-specified converter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    /// Cleaned Markdown to convert.
    pub input: PathBuf,
    /// LaTeX file to write.
    pub output: PathBuf,
    pub mode: ConversionMode,
}

impl Invocation {
    /// Arguments after the program name.
    ///
    /// `<input> -o <output>` plus `--template <path>` for template mode or
    /// `--standalone` for standalone mode. Fragment mode adds nothing.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.input.clone().into_os_string(),
            "-o".into(),
            self.output.clone().into_os_string(),
        ];
        match &self.mode {
            ConversionMode::Template { path } => {
                args.push("--template".into());
                args.push(path.clone().into_os_string());
            }
            ConversionMode::Standalone => args.push("--standalone".into()),
            ConversionMode::Fragment => {}
        }
        args
    }

    /// The command line for display, with arguments quoted when they
    /// contain spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args().iter().map(|a| quote(&a.to_string_lossy())))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Runs an [`Invocation`] to completion.
///
/// Implementations report exactly three outcomes: `Ok(())`,
/// [`Notion2TexError::ConverterNotFound`], or
/// [`Notion2TexError::ConverterFailed`] (other spawn errors surface as
/// `ConverterFailed` with the OS error text).
pub trait ConverterBackend: Send + Sync {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<(), Notion2TexError>> + Send;
}

/// Backend that spawns the converter as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct PandocRunner;

impl ConverterBackend for PandocRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), Notion2TexError> {
        info!("Running command: {}", invocation.command_line());

        let output = tokio::process::Command::new(&invocation.program)
            .args(invocation.args())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Notion2TexError::ConverterNotFound {
                        program: invocation.program.clone(),
                    }
                } else {
                    Notion2TexError::ConverterFailed {
                        program: invocation.program.clone(),
                        code: None,
                        stderr: format!("failed to start: {e}"),
                    }
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            warn!(
                "{} exited with {:?}: {}",
                invocation.program,
                output.status.code(),
                stderr.trim_end()
            );
            return Err(Notion2TexError::ConverterFailed {
                program: invocation.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        // pandoc prints warnings (missing images, unknown fields) on success too.
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", invocation.program, stderr.trim_end());
        }
        Ok(())
    }
}
