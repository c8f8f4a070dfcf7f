//! CLI binary for notion2latex.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use notion2latex::{
    convert, CleaningStats, ConversionMode, Notion2TexError, PipelineConfig,
    PipelineProgressCallback, PipelineReport, ProgressCallback, TerminalPrompter,
    DEFAULT_TEMPLATES,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: prints a header per stage and runs a spinner
/// while the converter works.
///
/// Everything goes to stderr. The spinner only exists between
/// `on_convert_start` and the converter's exit, so it never overlaps the
/// interactive questions.
struct CliProgressCallback {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
        })
    }

    fn start_spinner(&self, message: &str) {
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(bar);
        }
    }

    fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) {
            bar.finish_and_clear();
        }
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_clean_start(&self, input: &Path, lines: usize) {
        eprintln!(
            "{} {}  {}",
            cyan("◆"),
            bold("Step 1: Cleaning Markdown"),
            dim(&format!("{} ({lines} lines)", input.display())),
        );
    }

    fn on_clean_complete(&self, cleaned: &Path, stats: &CleaningStats) {
        eprintln!(
            "  {} Saved cleaned content to {}",
            green("✓"),
            bold(&cleaned.display().to_string()),
        );
        eprintln!("    {}", dim(&describe_stats(stats)));
    }

    fn on_mode_selected(&self, mode: &ConversionMode) {
        eprintln!(
            "{} {}  {}",
            cyan("◆"),
            bold("Step 2: Conversion mode"),
            mode
        );
    }

    fn on_convert_start(&self, program: &str, command: &str) {
        eprintln!("{} {}", cyan("◆"), bold("Step 3: Converting to LaTeX"));
        eprintln!("  Running command: {}", dim(command));
        self.start_spinner(&spinner_label(program));
    }

    fn on_convert_complete(&self, output: &Path) {
        self.stop_spinner();
        eprintln!(
            "{} Successfully converted to {}",
            green("✔"),
            bold(&output.display().to_string())
        );
    }

    fn on_convert_error(&self, _error: &str) {
        self.stop_spinner();
    }
}

/// Spinner text for the converter: its file name, not the whole path.
fn spinner_label(program: &str) -> String {
    let name = Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string());
    format!("waiting for {name}…")
}

fn describe_stats(stats: &CleaningStats) -> String {
    format!(
        "{} → {} lines  title {}  {} duplicate caption(s)  {} heading(s) un-bolded",
        stats.input_lines,
        stats.output_lines,
        if stats.title_removed {
            "removed"
        } else {
            "kept"
        },
        stats.captions_removed,
        stats.headings_unbolded,
    )
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive run on ./input.md (asks about bold headings and the mode)
  notion2latex

  # Clean and convert a specific export without any questions
  notion2latex "Project Notes.md" --strip-heading-bold --standalone

  # Use a custom template, write the result elsewhere
  notion2latex page.md --template report.tex -o build/page.tex

  # Work inside the export folder, only produce the cleaned Markdown
  notion2latex --dir ~/Downloads/export --clean-only

  # Machine-readable summary
  notion2latex page.md --keep-heading-bold --fragment --json > report.json

CONVERSION MODES:
  template     pandoc <in> -o <out> --template <file>
  standalone   pandoc <in> -o <out> --standalone
  fragment     pandoc <in> -o <out>

EXIT CODES:
  0  success               5  read / write / terminal failure
  1  internal error        6  template file not found
  2  invalid configuration 7  converter not installed
  3  input file not found  8  converter failed
  4  input file empty

ENVIRONMENT VARIABLES:
  N2L_DIR, N2L_OUTPUT, N2L_SUFFIX, N2L_TEMPLATES, N2L_CONVERTER, N2L_TEMPLATE
  mirror the flags of the same name. RUST_LOG overrides the log filter.

SETUP:
  Install pandoc: https://pandoc.org/installing.html
"#;

/// Clean Notion-exported Markdown and convert it to LaTeX with pandoc.
#[derive(Parser, Debug)]
#[command(
    name = "notion2latex",
    version,
    about = "Clean Notion-exported Markdown and convert it to LaTeX with pandoc",
    long_about = "Remove the artefacts Notion leaves in its Markdown export (a repeated page \
title, doubled image captions, bold headings), write the cleaned file next to the input, \
then run pandoc with a template, as a standalone document or as a body-only fragment.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(ArgGroup::new("preset_mode").args(["template", "standalone", "fragment"]))
)]
struct Cli {
    /// Notion Markdown export to convert.
    #[arg(env = "N2L_INPUT", default_value = "input.md")]
    input: PathBuf,

    /// Directory the input, templates and outputs are resolved against.
    #[arg(long, env = "N2L_DIR", default_value = ".")]
    dir: PathBuf,

    /// LaTeX output file (default: <input stem>.tex).
    #[arg(short, long, env = "N2L_OUTPUT")]
    output: Option<PathBuf>,

    /// Suffix appended to the input stem for the cleaned Markdown.
    #[arg(long, env = "N2L_SUFFIX", default_value = "_cleaned")]
    suffix: String,

    /// Template files offered in the interactive menu.
    #[arg(
        long = "menu-template",
        env = "N2L_TEMPLATES",
        value_delimiter = ',',
        default_values = DEFAULT_TEMPLATES
    )]
    menu_templates: Vec<String>,

    /// Converter program name or path.
    #[arg(long, env = "N2L_CONVERTER", default_value = "pandoc")]
    converter: String,

    /// Strip `**bold**` from headings without asking.
    #[arg(long, conflicts_with = "keep_heading_bold")]
    strip_heading_bold: bool,

    /// Keep headings as exported without asking.
    #[arg(long)]
    keep_heading_bold: bool,

    /// Convert with this template, skipping the menu.
    #[arg(long, env = "N2L_TEMPLATE", value_name = "FILE")]
    template: Option<PathBuf>,

    /// Produce a complete document with pandoc's default preamble.
    #[arg(long)]
    standalone: bool,

    /// Produce a body-only fragment.
    #[arg(long)]
    fragment: bool,

    /// Only write the cleaned Markdown; do not run the converter.
    #[arg(long, env = "N2L_CLEAN_ONLY")]
    clean_only: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "N2L_JSON")]
    json: bool,

    /// Disable step headers and the spinner.
    #[arg(long, env = "N2L_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "N2L_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and questions.
    #[arg(short, long, env = "N2L_QUIET")]
    quiet: bool,
}

impl Cli {
    fn strip_heading_bold(&self) -> Option<bool> {
        match (self.strip_heading_bold, self.keep_heading_bold) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn preset_mode(&self) -> Option<ConversionMode> {
        if let Some(ref path) = self.template {
            Some(ConversionMode::Template { path: path.clone() })
        } else if self.standalone {
            Some(ConversionMode::Standalone)
        } else if self.fragment {
            Some(ConversionMode::Fragment)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The step headers replace INFO logs while progress output is on.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Notion2TexError>() {
                Some(e) => eprintln!("{} {} failed: {}", red("✘"), e.stage(), e),
                None => eprintln!("{} {:#}", red("✘"), err),
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };

    let config = build_config(cli, progress_cb)?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let report = convert(&config, &mut TerminalPrompter::terminal()).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        print_summary(&report);
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .work_dir(&cli.dir)
        .input(&cli.input)
        .cleaned_suffix(&cli.suffix)
        .templates(&cli.menu_templates)
        .converter(&cli.converter)
        .clean_only(cli.clean_only);

    if let Some(ref out) = cli.output {
        builder = builder.output(out);
    }
    if let Some(strip) = cli.strip_heading_bold() {
        builder = builder.strip_heading_bold(strip);
    }
    if let Some(mode) = cli.preset_mode() {
        builder = builder.mode(mode);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    Ok(builder.build()?)
}

fn print_summary(report: &PipelineReport) {
    eprintln!(
        "Cleaned {} → {}  ({}ms)",
        report.input.display(),
        report.cleaned.display(),
        report.clean_duration_ms
    );
    eprintln!("  {}", describe_stats(&report.stats));
    if let (Some(out), Some(mode)) = (&report.output, &report.mode) {
        eprintln!(
            "Converted to {} as {}  ({}ms)",
            out.display(),
            mode,
            report.convert_duration_ms
        );
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Notion2TexError>()
        .map(Notion2TexError::exit_code)
        .unwrap_or(1)
}
