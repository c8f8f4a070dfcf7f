//! Pipeline entry points.
//!
//! [`convert`] runs every stage in order: clean, select a mode, invoke the
//! converter. [`clean_to_file`] stops after the cleaned Markdown is written.
//! The first fatal error aborts all remaining stages; nothing is retried.

use crate::config::PipelineConfig;
use crate::error::Notion2TexError;
use crate::output::{CleaningStats, PipelineReport};
use crate::pipeline::invoke::{ConverterBackend, Invocation, PandocRunner};
use crate::pipeline::select::{self, ModeMenu};
use crate::pipeline::{input, normalize};
use crate::prompt::Prompter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Read, clean and write the input Markdown.
///
/// Asks the heading-bold question through `prompter` unless
/// `config.strip_heading_bold` is set. Returns the cleaned file's path.
///
/// # Errors
/// - Input file not found / unreadable / empty
/// - Cleaned file could not be written
/// - The prompt's input closed before a valid answer
pub async fn clean_to_file<P: Prompter + ?Sized>(
    config: &PipelineConfig,
    prompter: &mut P,
) -> Result<(PathBuf, CleaningStats), Notion2TexError> {
    let input_path = config.input_path();
    info!("Cleaning '{}'", input_path.display());

    // ── Step 1: Read ─────────────────────────────────────────────────────
    let doc = input::read_document(&input_path).await?;
    let lines = doc.lines();

    if let Some(ref cb) = config.progress_callback {
        cb.on_clean_start(&input_path, lines.len());
    }

    // ── Step 2: Normalise ────────────────────────────────────────────────
    let strip_bold = match config.strip_heading_bold {
        Some(v) => v,
        None => select::ask_strip_heading_bold(prompter)?,
    };
    let normalized = normalize::normalize(&lines, strip_bold)?;

    // ── Step 3: Write ────────────────────────────────────────────────────
    let cleaned_path = config.cleaned_path();
    write_atomic(&cleaned_path, normalized.to_text()).await?;
    info!("Saved cleaned content to '{}'", cleaned_path.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_clean_complete(&cleaned_path, &normalized.stats);
    }

    Ok((cleaned_path, normalized.stats))
}

/// Run the whole pipeline with the real converter.
///
/// Equivalent to [`convert_with`] using [`PandocRunner`].
pub async fn convert<P: Prompter + ?Sized>(
    config: &PipelineConfig,
    prompter: &mut P,
) -> Result<PipelineReport, Notion2TexError> {
    convert_with(config, prompter, &PandocRunner).await
}

/// Run the whole pipeline with a caller-supplied converter backend.
///
/// # Returns
/// A [`PipelineReport`]; `output` and `mode` are `None` when
/// `config.clean_only` is set.
///
/// # Errors
/// Every [`Notion2TexError`] is fatal. A preset template that does not
/// exist yields [`Notion2TexError::TemplateNotFound`] before the converter is
/// invoked.
pub async fn convert_with<P, B>(
    config: &PipelineConfig,
    prompter: &mut P,
    backend: &B,
) -> Result<PipelineReport, Notion2TexError>
where
    P: Prompter + ?Sized,
    B: ConverterBackend,
{
    let clean_start = Instant::now();
    let (cleaned_path, stats) = clean_to_file(config, prompter).await?;
    let clean_duration_ms = clean_start.elapsed().as_millis() as u64;

    let mut report = PipelineReport {
        input: config.input_path(),
        cleaned: cleaned_path.clone(),
        output: None,
        mode: None,
        stats,
        clean_duration_ms,
        convert_duration_ms: 0,
    };

    if config.clean_only {
        info!("Clean-only run; skipping conversion");
        return Ok(report);
    }

    // ── Step 4: Select mode ──────────────────────────────────────────────
    let mode = match config.preset_mode() {
        Some(mode) => {
            select::validate_preset(&mode)?;
            mode
        }
        None => select::select_mode(prompter, &ModeMenu::from_config(config))?,
    };
    info!("Conversion mode: {}", mode);

    if let Some(ref cb) = config.progress_callback {
        cb.on_mode_selected(&mode);
    }

    // ── Step 5: Convert ──────────────────────────────────────────────────
    let invocation = Invocation {
        program: config.converter.clone(),
        input: cleaned_path,
        output: config.output_path(),
        mode: mode.clone(),
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_convert_start(&invocation.program, &invocation.command_line());
    }

    let convert_start = Instant::now();
    if let Err(e) = backend.run(&invocation).await {
        warn!("Conversion failed: {}", e);
        if let Some(ref cb) = config.progress_callback {
            cb.on_convert_error(&e.to_string());
        }
        return Err(e);
    }
    report.convert_duration_ms = convert_start.elapsed().as_millis() as u64;

    info!(
        "Converted '{}' to '{}' in {}ms",
        report.cleaned.display(),
        invocation.output.display(),
        report.convert_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_convert_complete(&invocation.output);
    }

    report.output = Some(invocation.output);
    report.mode = Some(mode);
    Ok(report)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync<P: Prompter + ?Sized>(
    config: &PipelineConfig,
    prompter: &mut P,
) -> Result<PipelineReport, Notion2TexError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Notion2TexError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(config, prompter))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Write `contents` to `path` via a temp file in the same directory, so a
/// failed write never leaves a truncated cleaned file behind.
async fn write_atomic(path: &Path, contents: String) -> Result<(), Notion2TexError> {
    let target = path.to_path_buf();
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let write_target = target.clone();
    let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&write_target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .unwrap_or_else(|e| Err(join_failure(e)));

    result.map_err(|source| Notion2TexError::WriteFailed {
        path: target,
        source,
    })
}

fn join_failure(e: tokio::task::JoinError) -> std::io::Error {
    std::io::Error::other(format!("write task failed: {e}"))
}
