//! Configuration types for the clean-and-convert pipeline.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built via
//! its [`PipelineConfigBuilder`]. Everything the pipeline touches on disk is
//! resolved against an explicit working directory rather than the location
//! of the executable, so the same config always names the same files.

use crate::error::Notion2TexError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Template files offered in the mode menu when none are configured.
pub const DEFAULT_TEMPLATES: [&str; 3] = [
    "Philips-Pandoc-LaTeX-Vorlage_WK1-Format.tex",
    "Philips-Pandoc-LaTeX-Vorlage-mit-Vorwort-und-Disclaimer.tex",
    "Philips-Pandoc-LaTeX-Vorlage.tex",
];

/// Configuration for one clean-and-convert run.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use notion2latex::{ConversionMode, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .work_dir("/tmp/export")
///     .input("notes.md")
///     .strip_heading_bold(true)
///     .mode(ConversionMode::Fragment)
///     .build()
///     .unwrap();
///
/// assert!(config.cleaned_path().ends_with("notes_cleaned.md"));
/// assert!(config.output_path().ends_with("notes.tex"));
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory that relative input, template and output paths resolve
    /// against. Default: `.`.
    pub work_dir: PathBuf,

    /// Notion-exported Markdown file. Default: `input.md`.
    pub input: PathBuf,

    /// Suffix appended to the input stem for the cleaned Markdown.
    /// Default: `_cleaned` (`input.md` → `input_cleaned.md`).
    pub cleaned_suffix: String,

    /// Explicit LaTeX output path. Default: `<stem>.tex` next to the input.
    pub output: Option<PathBuf>,

    /// Template files listed as named entries in the mode menu.
    pub templates: Vec<PathBuf>,

    /// Converter executable name or path. Default: `pandoc`.
    pub converter: String,

    /// Strip bold markup directly after heading markers.
    /// `None` asks interactively.
    pub strip_heading_bold: Option<bool>,

    /// Preset conversion mode. `None` shows the interactive menu.
    pub mode: Option<ConversionMode>,

    /// Stop after writing the cleaned Markdown; never run the converter.
    pub clean_only: bool,

    /// Stage-event sink (terminal spinner, logging, tests).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            input: PathBuf::from("input.md"),
            cleaned_suffix: "_cleaned".to_string(),
            output: None,
            templates: DEFAULT_TEMPLATES.iter().map(PathBuf::from).collect(),
            converter: "pandoc".to_string(),
            strip_heading_bold: None,
            mode: None,
            clean_only: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("work_dir", &self.work_dir)
            .field("input", &self.input)
            .field("cleaned_suffix", &self.cleaned_suffix)
            .field("output", &self.output)
            .field("templates", &self.templates)
            .field("converter", &self.converter)
            .field("strip_heading_bold", &self.strip_heading_bold)
            .field("mode", &self.mode)
            .field("clean_only", &self.clean_only)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute-or-relative path of the input file, resolved against `work_dir`.
    pub fn input_path(&self) -> PathBuf {
        self.work_dir.join(&self.input)
    }

    /// `<stem><suffix>.md`, next to the input.
    pub fn cleaned_path(&self) -> PathBuf {
        let input = self.input_path();
        let name = format!("{}{}.md", file_stem(&input), self.cleaned_suffix);
        input.with_file_name(name)
    }

    /// The explicit output path, or `<stem>.tex` next to the input.
    pub fn output_path(&self) -> PathBuf {
        match self.output {
            Some(ref out) => self.work_dir.join(out),
            None => {
                let input = self.input_path();
                input.with_file_name(format!("{}.tex", file_stem(&input)))
            }
        }
    }

    /// The preset mode, with a template path resolved against `work_dir`.
    pub fn preset_mode(&self) -> Option<ConversionMode> {
        self.mode.as_ref().map(|mode| match mode {
            ConversionMode::Template { path } => ConversionMode::Template {
                path: self.work_dir.join(path),
            },
            other => other.clone(),
        })
    }

    /// Menu templates resolved against `work_dir`.
    pub fn template_paths(&self) -> Vec<PathBuf> {
        self.templates
            .iter()
            .map(|t| self.work_dir.join(t))
            .collect()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = dir.into();
        self
    }

    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    pub fn cleaned_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.cleaned_suffix = suffix.into();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = Some(output.into());
        self
    }

    /// Replace the menu templates.
    pub fn templates<I, P>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.templates = templates.into_iter().map(Into::into).collect();
        self
    }

    pub fn converter(mut self, program: impl Into<String>) -> Self {
        self.config.converter = program.into();
        self
    }

    pub fn strip_heading_bold(mut self, v: bool) -> Self {
        self.config.strip_heading_bold = Some(v);
        self
    }

    pub fn mode(mut self, mode: ConversionMode) -> Self {
        self.config.mode = Some(mode);
        self
    }

    pub fn clean_only(mut self, v: bool) -> Self {
        self.config.clean_only = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, Notion2TexError> {
        let c = &self.config;
        if c.input.as_os_str().is_empty() {
            return Err(Notion2TexError::InvalidConfig(
                "input file name must not be empty".into(),
            ));
        }
        if c.converter.trim().is_empty() {
            return Err(Notion2TexError::InvalidConfig(
                "converter program must not be empty".into(),
            ));
        }
        if c.cleaned_suffix.is_empty() {
            return Err(Notion2TexError::InvalidConfig(
                "cleaned suffix must not be empty (it would overwrite the input)".into(),
            ));
        }
        if c.cleaned_path() == c.output_path() {
            return Err(Notion2TexError::InvalidConfig(format!(
                "output path '{}' collides with the cleaned Markdown file",
                c.output_path().display()
            )));
        }
        if c.input_path() == c.output_path() {
            return Err(Notion2TexError::InvalidConfig(format!(
                "output path '{}' would overwrite the input file",
                c.output_path().display()
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the converter is asked to shape its output.
///
/// | Mode | Converter flags | Result |
/// |------|-----------------|--------|
/// | `Template` | `--template <path>` | Complete document from a custom preamble |
/// | `Standalone` | `--standalone` | Complete document with the default preamble |
/// | `Fragment` | none | Body only, to `\input{}` into another document |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConversionMode {
    /// Convert with a named template file.
    Template { path: PathBuf },
    /// Complete document with the converter's default preamble.
    Standalone,
    /// Body only.
    Fragment,
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMode::Template { path } => write!(f, "template '{}'", path.display()),
            ConversionMode::Standalone => f.write_str("standalone"),
            ConversionMode::Fragment => f.write_str("fragment"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_input_stem() {
        let config = PipelineConfig::builder().work_dir("/data").build().unwrap();
        assert_eq!(config.input_path(), PathBuf::from("/data/input.md"));
        assert_eq!(config.cleaned_path(), PathBuf::from("/data/input_cleaned.md"));
        assert_eq!(config.output_path(), PathBuf::from("/data/input.tex"));
    }

    #[test]
    fn multi_dot_stem_keeps_inner_dots() {
        let config = PipelineConfig::builder()
            .work_dir("/data")
            .input("report.v2.md")
            .build()
            .unwrap();
        assert_eq!(config.cleaned_path(), PathBuf::from("/data/report.v2_cleaned.md"));
        assert_eq!(config.output_path(), PathBuf::from("/data/report.v2.tex"));
    }

    #[test]
    fn explicit_output_resolves_against_work_dir() {
        let config = PipelineConfig::builder()
            .work_dir("/data")
            .output("build/out.tex")
            .build()
            .unwrap();
        assert_eq!(config.output_path(), PathBuf::from("/data/build/out.tex"));
    }

    #[test]
    fn absolute_template_is_not_rebased() {
        let config = PipelineConfig::builder()
            .work_dir("/data")
            .templates(["local.tex", "/etc/tpl/global.tex"])
            .build()
            .unwrap();
        assert_eq!(
            config.template_paths(),
            vec![
                PathBuf::from("/data/local.tex"),
                PathBuf::from("/etc/tpl/global.tex")
            ]
        );
    }

    #[test]
    fn preset_template_resolves_against_work_dir() {
        let config = PipelineConfig::builder()
            .work_dir("/data")
            .mode(ConversionMode::Template {
                path: "tpl/book.tex".into(),
            })
            .build()
            .unwrap();
        assert_eq!(
            config.preset_mode(),
            Some(ConversionMode::Template {
                path: PathBuf::from("/data/tpl/book.tex")
            })
        );
        assert_eq!(PipelineConfig::default().preset_mode(), None);
    }

    #[test]
    fn default_menu_lists_three_templates() {
        assert_eq!(PipelineConfig::default().templates.len(), 3);
    }

    #[test]
    fn empty_suffix_rejected() {
        let err = PipelineConfig::builder().cleaned_suffix("").build().unwrap_err();
        assert!(matches!(err, Notion2TexError::InvalidConfig(_)));
    }

    #[test]
    fn empty_converter_rejected() {
        let err = PipelineConfig::builder().converter("  ").build().unwrap_err();
        assert!(matches!(err, Notion2TexError::InvalidConfig(_)));
    }

    #[test]
    fn output_colliding_with_cleaned_file_rejected() {
        let err = PipelineConfig::builder()
            .output("input_cleaned.md")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn output_overwriting_input_rejected() {
        let err = PipelineConfig::builder()
            .output("input.md")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("overwrite the input"));

        // A `.tex` input would be its own default output.
        let err = PipelineConfig::builder().input("notes.tex").build().unwrap_err();
        assert!(matches!(err, Notion2TexError::InvalidConfig(_)));
    }

    #[test]
    fn mode_serialises_with_tag() {
        let json = serde_json::to_string(&ConversionMode::Standalone).unwrap();
        assert_eq!(json, r#"{"mode":"standalone"}"#);
        let json = serde_json::to_string(&ConversionMode::Template {
            path: "t.tex".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"mode":"template","path":"t.tex"}"#);
    }
}
