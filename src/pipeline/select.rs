//! Mode selection: the interactive questions asked between cleaning and
//! conversion.
//!
//! Two questions exist: whether to strip bold from headings, and which
//! conversion mode to use. Both loop until the answer is valid; a bad answer
//! is an [`InvalidUserInput`] that is shown and re-asked, never a failure.
//! Only a closed or broken terminal ends the loop with an error.

use crate::config::{ConversionMode, PipelineConfig};
use crate::error::{InvalidUserInput, Notion2TexError, Stage};
use crate::prompt::Prompter;
use std::path::PathBuf;
use tracing::debug;

const BOLD_QUESTION: &str =
    "Do you want to remove bold formatting from headings (e.g., '### **Title**')? (y/n): ";
const MODE_QUESTION: &str = "Enter the number of your choice: ";

/// Parse a yes/no answer: exactly `y` or `n`, either case.
pub fn parse_yes_no(answer: &str) -> Result<bool, InvalidUserInput> {
    match answer {
        "y" | "Y" => Ok(true),
        "n" | "N" => Ok(false),
        other => Err(InvalidUserInput::NotYesNo {
            answer: other.to_string(),
        }),
    }
}

/// Ask whether heading bold should be stripped, until answered `y` or `n`.
pub fn ask_strip_heading_bold<P: Prompter + ?Sized>(
    prompter: &mut P,
) -> Result<bool, Notion2TexError> {
    loop {
        let answer = ask(prompter, BOLD_QUESTION, Stage::Clean)?;
        match parse_yes_no(&answer) {
            Ok(v) => return Ok(v),
            Err(e) => say(prompter, &e.to_string(), Stage::Clean)?,
        }
    }
}

/// One numbered line of the mode menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// A template file: label as configured, path resolved against the work dir.
    Template { label: String, path: PathBuf },
    Standalone,
    Fragment,
}

impl MenuEntry {
    fn label(&self) -> String {
        match self {
            MenuEntry::Template { label, .. } => label.clone(),
            MenuEntry::Standalone => "standalone (complete document, default preamble)".into(),
            MenuEntry::Fragment => "fragment (document body only)".into(),
        }
    }
}

/// The numbered conversion menu: named templates, then standalone, then fragment.
#[derive(Debug, Clone)]
pub struct ModeMenu {
    entries: Vec<MenuEntry>,
}

impl ModeMenu {
    pub fn new(templates: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        let mut entries: Vec<MenuEntry> = templates
            .into_iter()
            .map(|(label, path)| MenuEntry::Template { label, path })
            .collect();
        entries.push(MenuEntry::Standalone);
        entries.push(MenuEntry::Fragment);
        Self { entries }
    }

    /// Menu listing the configured templates.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let labels = config
            .templates
            .iter()
            .map(|t| t.display().to_string());
        Self::new(labels.zip(config.template_paths()))
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// The menu as printed, one `  N: label` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::from("Please choose a conversion mode:");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("\n  {}: {}", i + 1, entry.label()));
        }
        out
    }

    /// Turn a 1-based answer into a mode.
    ///
    /// A template whose file is missing is rejected so the user can pick again.
    pub fn resolve(&self, answer: &str) -> Result<ConversionMode, InvalidUserInput> {
        let choice: i64 = answer
            .trim()
            .parse()
            .map_err(|_| InvalidUserInput::NotANumber {
                answer: answer.to_string(),
            })?;

        let max = self.entries.len();
        let entry = usize::try_from(choice)
            .ok()
            .filter(|c| (1..=max).contains(c))
            .map(|c| &self.entries[c - 1])
            .ok_or(InvalidUserInput::OutOfRange { choice, max })?;

        match entry {
            MenuEntry::Template { path, .. } => {
                if !path.exists() {
                    return Err(InvalidUserInput::TemplateMissing { path: path.clone() });
                }
                Ok(ConversionMode::Template { path: path.clone() })
            }
            MenuEntry::Standalone => Ok(ConversionMode::Standalone),
            MenuEntry::Fragment => Ok(ConversionMode::Fragment),
        }
    }
}

/// Show the menu and ask until a valid mode is chosen.
pub fn select_mode<P: Prompter + ?Sized>(
    prompter: &mut P,
    menu: &ModeMenu,
) -> Result<ConversionMode, Notion2TexError> {
    say(prompter, &menu.render(), Stage::SelectMode)?;
    loop {
        let answer = ask(prompter, MODE_QUESTION, Stage::SelectMode)?;
        match menu.resolve(&answer) {
            Ok(mode) => {
                debug!("Selected mode: {mode}");
                return Ok(mode);
            }
            Err(e) => say(prompter, &e.to_string(), Stage::SelectMode)?,
        }
    }
}

/// Check a mode chosen up front (not from the menu).
///
/// Unlike the menu there is nobody to re-ask, so a missing template is fatal.
pub fn validate_preset(mode: &ConversionMode) -> Result<(), Notion2TexError> {
    match mode {
        ConversionMode::Template { path } if !path.exists() => {
            Err(Notion2TexError::TemplateNotFound { path: path.clone() })
        }
        _ => Ok(()),
    }
}

fn ask<P: Prompter + ?Sized>(
    prompter: &mut P,
    question: &str,
    stage: Stage,
) -> Result<String, Notion2TexError> {
    match prompter.ask(question) {
        Ok(Some(answer)) => Ok(answer),
        Ok(None) => Err(Notion2TexError::PromptFailed {
            stage,
            source: std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before a valid answer was given",
            ),
        }),
        Err(source) => Err(Notion2TexError::PromptFailed { stage, source }),
    }
}

fn say<P: Prompter + ?Sized>(
    prompter: &mut P,
    message: &str,
    stage: Stage,
) -> Result<(), Notion2TexError> {
    prompter
        .say(message)
        .map_err(|source| Notion2TexError::PromptFailed { stage, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::TerminalPrompter;
    use std::io::Cursor;

    fn prompter(script: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn menu_in(dir: &std::path::Path, present: &[&str], absent: &[&str]) -> ModeMenu {
        for name in present {
            std::fs::write(dir.join(name), "$body$").unwrap();
        }
        let templates = present
            .iter()
            .chain(absent)
            .map(|n| (n.to_string(), dir.join(n)));
        ModeMenu::new(templates)
    }

    #[test]
    fn test_yes_no_parsing() {
        assert_eq!(parse_yes_no("y"), Ok(true));
        assert_eq!(parse_yes_no("N"), Ok(false));
        for bad in ["", "yes", "no", "x", "1", " Y ", " y", "n ", "\ty"] {
            assert!(parse_yes_no(bad).is_err(), "answer = {bad:?}");
        }
    }

    #[test]
    fn test_bold_question_reprompts_until_valid() {
        let mut p = prompter("maybe\n\nYES\nn\n");
        assert!(!ask_strip_heading_bold(&mut p).unwrap());
        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert_eq!(shown.matches("(y/n): ").count(), 4);
        assert_eq!(shown.matches("Please answer 'y' or 'n'").count(), 3);
    }

    #[test]
    fn test_bold_question_rejects_padded_answer() {
        let mut p = prompter(" y\ny \nY\n");
        assert!(ask_strip_heading_bold(&mut p).unwrap());
        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert_eq!(shown.matches("Please answer 'y' or 'n'").count(), 2);
    }

    #[test]
    fn test_bold_question_eof_is_fatal() {
        let mut p = prompter("maybe\n");
        let err = ask_strip_heading_bold(&mut p).unwrap_err();
        assert!(matches!(
            err,
            Notion2TexError::PromptFailed {
                stage: Stage::Clean,
                ..
            }
        ));
    }

    #[test]
    fn test_menu_layout() {
        let menu = ModeMenu::new([("a.tex".to_string(), PathBuf::from("/t/a.tex"))]);
        assert_eq!(
            menu.render(),
            "Please choose a conversion mode:\n  \
             1: a.tex\n  \
             2: standalone (complete document, default preamble)\n  \
             3: fragment (document body only)"
        );
        assert_eq!(menu.entries().len(), 3);
    }

    #[test]
    fn test_generic_modes_resolve_without_files() {
        let menu = ModeMenu::new(Vec::new());
        assert_eq!(menu.resolve("1"), Ok(ConversionMode::Standalone));
        assert_eq!(menu.resolve(" 2 "), Ok(ConversionMode::Fragment));
    }

    #[test]
    fn test_out_of_range_and_non_numeric() {
        let menu = ModeMenu::new(Vec::new());
        assert_eq!(
            menu.resolve("0"),
            Err(InvalidUserInput::OutOfRange { choice: 0, max: 2 })
        );
        assert_eq!(
            menu.resolve("-3"),
            Err(InvalidUserInput::OutOfRange { choice: -3, max: 2 })
        );
        assert_eq!(
            menu.resolve("3"),
            Err(InvalidUserInput::OutOfRange { choice: 3, max: 2 })
        );
        assert!(matches!(
            menu.resolve("two"),
            Err(InvalidUserInput::NotANumber { .. })
        ));
    }

    #[test]
    fn test_existing_template_resolves() {
        let dir = tempfile::TempDir::new().unwrap();
        let menu = menu_in(dir.path(), &["ok.tex"], &[]);
        assert_eq!(
            menu.resolve("1"),
            Ok(ConversionMode::Template {
                path: dir.path().join("ok.tex")
            })
        );
    }

    #[test]
    fn test_missing_template_reprompts() {
        let dir = tempfile::TempDir::new().unwrap();
        let menu = menu_in(dir.path(), &["ok.tex"], &["gone.tex"]);
        // 2 = gone.tex (missing), then 9 (out of range), then x, then 1.
        let mut p = prompter("2\n9\nx\n1\n");
        let mode = select_mode(&mut p, &menu).unwrap();
        assert_eq!(
            mode,
            ConversionMode::Template {
                path: dir.path().join("ok.tex")
            }
        );
        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("Template file not found"));
        assert!(shown.contains("between 1 and 4"));
        assert!(shown.contains("Please enter a number."));
    }

    #[test]
    fn test_select_mode_eof_is_fatal() {
        let menu = ModeMenu::new(Vec::new());
        let mut p = prompter("");
        let err = select_mode(&mut p, &menu).unwrap_err();
        assert_eq!(err.stage(), Stage::SelectMode);
    }

    #[test]
    fn test_preset_template_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = ConversionMode::Template {
            path: dir.path().join("missing.tex"),
        };
        assert!(matches!(
            validate_preset(&missing),
            Err(Notion2TexError::TemplateNotFound { .. })
        ));
        assert!(validate_preset(&ConversionMode::Fragment).is_ok());
        assert!(validate_preset(&ConversionMode::Standalone).is_ok());
    }

    #[test]
    fn test_menu_from_config_resolves_against_work_dir() {
        let config = PipelineConfig::builder()
            .work_dir("/w")
            .templates(["t.tex"])
            .build()
            .unwrap();
        let menu = ModeMenu::from_config(&config);
        assert_eq!(
            menu.entries()[0],
            MenuEntry::Template {
                label: "t.tex".into(),
                path: PathBuf::from("/w/t.tex"),
            }
        );
    }
}
