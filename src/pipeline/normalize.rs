//! Normaliser: remove Notion export artefacts from Markdown lines.
//!
//! Notion's Markdown export repeats the page title as a level-1 heading on
//! the first line and writes every image caption twice: once as the alt text
//! of `![caption](file.png)` and again as a plain paragraph below it,
//! sometimes separated by blank lines. Headings styled bold in Notion also
//! come out as `### **Title**`, which renders oddly once the heading is a
//! real LaTeX section.
//!
//! ## Passes
//!
//! 1. Drop the first line if it is a `# ` title.
//! 2. Drop the caption line that repeats an image's alt text, keeping any
//!    blank lines in between untouched.
//! 3. Optionally unwrap a `**bold**` span that directly follows a heading
//!    marker.
//!
//! Each pass is a pure function over borrowed lines. Lines are only ever
//! removed or (in pass 3) rewritten in place; nothing is reordered or
//! invented, so every output line is either an input line or the
//! bold-stripped form of one.

use crate::error::Notion2TexError;
use crate::output::CleaningStats;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

/// Cleaned lines plus what changed.
#[derive(Debug, Clone)]
pub struct Normalized<'a> {
    pub lines: Vec<Cow<'a, str>>,
    pub stats: CleaningStats,
}

impl Normalized<'_> {
    /// Concatenate the lines back into a document.
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }
}

/// Run all passes over `lines`.
///
/// # Errors
/// [`Notion2TexError::EmptyInput`] when `lines` is empty; callers must abort
/// the pipeline rather than write an empty cleaned file.
pub fn normalize<'a>(
    lines: &[&'a str],
    strip_heading_bold: bool,
) -> Result<Normalized<'a>, Notion2TexError> {
    if lines.is_empty() {
        return Err(Notion2TexError::EmptyInput);
    }

    let body = strip_leading_title(lines);
    let title_removed = body.len() < lines.len();

    let deduped = remove_duplicate_captions(body);
    let captions_removed = body.len() - deduped.len();

    let (cleaned, headings_unbolded) = if strip_heading_bold {
        let mut rewritten = 0;
        let cleaned: Vec<Cow<'a, str>> = deduped
            .into_iter()
            .map(|line| {
                let out = strip_heading_bold_line(line);
                if matches!(out, Cow::Owned(_)) {
                    rewritten += 1;
                }
                out
            })
            .collect();
        (cleaned, rewritten)
    } else {
        (deduped.into_iter().map(Cow::Borrowed).collect(), 0)
    };

    let stats = CleaningStats {
        input_lines: lines.len(),
        output_lines: cleaned.len(),
        title_removed,
        captions_removed,
        headings_unbolded,
    };
    debug!(
        "Normalised {} → {} lines (title removed: {}, captions removed: {}, headings unbolded: {})",
        stats.input_lines,
        stats.output_lines,
        stats.title_removed,
        stats.captions_removed,
        stats.headings_unbolded
    );

    Ok(Normalized {
        lines: cleaned,
        stats,
    })
}

// ── Pass 1: Leading title ────────────────────────────────────────────────────

/// Skip the first line when, ignoring trailing whitespace, it starts with `# `.
///
/// Only the very first line is ever considered.
pub fn strip_leading_title<'s, 'a>(lines: &'s [&'a str]) -> &'s [&'a str] {
    match lines.split_first() {
        Some((first, rest)) if first.trim_end().starts_with("# ") => rest,
        _ => lines,
    }
}

// ── Pass 2: Duplicate captions ───────────────────────────────────────────────

static RE_IMAGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*!\[(.*)\]\(.*\)\s*$").unwrap());

/// The trimmed alt text of an image-reference line, if non-empty.
fn image_caption(line: &str) -> Option<&str> {
    let caps = RE_IMAGE_LINE.captures(line)?;
    let alt = caps.get(1)?.as_str().trim();
    (!alt.is_empty()).then_some(alt)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drop the line repeating an image's caption.
///
/// For each image line with a non-empty caption, look past any blank lines
/// to the next non-blank line. If its trimmed text equals the caption, keep
/// the image line and the blank lines verbatim and drop that one line.
/// Anything else is kept as is. Once every caption has been de-duplicated a
/// second run changes nothing; a caption exported twice in a row loses one
/// copy per run.
pub fn remove_duplicate_captions<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut result = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let current = lines[i];

        if let Some(alt) = image_caption(current) {
            let j = (i + 1..lines.len())
                .find(|&k| !is_blank(lines[k]))
                .unwrap_or(lines.len());

            if j < lines.len() && lines[j].trim() == alt {
                result.push(current);
                result.extend_from_slice(&lines[i + 1..j]);
                i = j + 1;
                continue;
            }
        }

        result.push(current);
        i += 1;
    }

    result
}

// ── Pass 3: Heading bold ─────────────────────────────────────────────────────

static RE_BOLD_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+\s+)\*\*(.*?)\*\*(.*)$").unwrap());

/// Remove the `**` pair directly after a heading marker.
///
/// `### **Title**` → `### Title`, `## **A** and **B**` → `## A and **B**`.
/// Lines that do not match are returned borrowed and unchanged; the line
/// terminator is preserved.
pub fn strip_heading_bold_line(line: &str) -> Cow<'_, str> {
    let (body, terminator) = split_terminator(line);
    match RE_BOLD_HEADING.captures(body) {
        Some(caps) => {
            let mut out = String::with_capacity(line.len());
            out.push_str(&caps[1]);
            out.push_str(&caps[2]);
            out.push_str(&caps[3]);
            out.push_str(terminator);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(line),
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    match line.strip_suffix('\n') {
        Some(body) => (body, &line[body.len()..]),
        None => (line, ""),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::input::split_lines;

    fn clean(text: &str, strip_bold: bool) -> String {
        let lines = split_lines(text);
        normalize(&lines, strip_bold).unwrap().to_text()
    }

    // ── Title ────────────────────────────────────────────────────────────

    #[test]
    fn test_title_dropped() {
        let lines = ["# My Page\n", "Body\n"];
        assert_eq!(strip_leading_title(&lines), &["Body\n"]);
    }

    #[test]
    fn test_non_title_first_line_kept() {
        for first in ["## Section\n", "#Tag\n", "Text\n", "\n", " # Indented\n"] {
            let lines = [first, "Body\n"];
            assert_eq!(strip_leading_title(&lines).len(), 2, "first = {first:?}");
        }
    }

    #[test]
    fn test_bare_hash_space_is_not_a_title() {
        // Trailing whitespace is ignored, so "# " alone is just "#".
        let lines = ["# \n", "Body\n"];
        assert_eq!(strip_leading_title(&lines).len(), 2);
    }

    #[test]
    fn test_only_first_line_considered() {
        let lines = ["Intro\n", "# Later Title\n"];
        assert_eq!(strip_leading_title(&lines).len(), 2);
        let lines = ["# A\n", "# B\n"];
        assert_eq!(strip_leading_title(&lines), &["# B\n"]);
    }

    // ── Captions ─────────────────────────────────────────────────────────

    #[test]
    fn test_adjacent_caption_removed() {
        let lines = ["![Caption](x.png)\n", "Caption\n", "Next\n"];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["![Caption](x.png)\n", "Next\n"]
        );
    }

    #[test]
    fn test_caption_after_blank_lines_removed_blanks_kept() {
        let lines = ["![Caption](x.png)\n", "\n", "   \n", "Caption\n", "After\n"];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["![Caption](x.png)\n", "\n", "   \n", "After\n"]
        );
    }

    #[test]
    fn test_non_matching_line_kept() {
        let lines = ["![Caption](x.png)\n", "Something else\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
    }

    #[test]
    fn test_non_matching_after_blanks_keeps_everything() {
        let lines = ["![Caption](x.png)\n", "\n", "Other\n", "Caption\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
    }

    #[test]
    fn test_trailing_blanks_at_eof_kept() {
        let lines = ["![Caption](x.png)\n", "\n", "\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
    }

    #[test]
    fn test_caption_comparison_is_trimmed_and_case_sensitive() {
        let lines = ["  ![ Fig 1 ](a.png)  \n", "\tFig 1  \n"];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["  ![ Fig 1 ](a.png)  \n"]
        );
        let lines = ["![Fig](a.png)\n", "fig\n"];
        assert_eq!(remove_duplicate_captions(&lines).len(), 2);
    }

    #[test]
    fn test_empty_or_blank_alt_never_matches() {
        let lines = ["![](a.png)\n", "\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
        let lines = ["![   ](a.png)\n", "   \n", "x\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
    }

    #[test]
    fn test_inline_image_is_not_an_image_line() {
        let lines = ["See ![Chart](c.png) here\n", "Chart\n"];
        assert_eq!(remove_duplicate_captions(&lines), lines.to_vec());
    }

    #[test]
    fn test_only_one_duplicate_removed_per_image() {
        let lines = ["![Cat](cat.png)\n", "Cat\n", "Cat\n"];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["![Cat](cat.png)\n", "Cat\n"]
        );
    }

    #[test]
    fn test_consecutive_images_each_lose_their_caption() {
        let lines = [
            "![A](a.png)\n",
            "A\n",
            "![B](b.png)\n",
            "\n",
            "B\n",
        ];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["![A](a.png)\n", "![B](b.png)\n", "\n"]
        );
    }

    #[test]
    fn test_image_followed_by_identical_image_line() {
        // The next non-blank line is itself an image line, not the caption text.
        let lines = ["![A](a.png)\n", "![A](a.png)\n", "A\n"];
        assert_eq!(
            remove_duplicate_captions(&lines),
            vec!["![A](a.png)\n", "![A](a.png)\n"]
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        let lines = ["![Cap](x.png)\n", "Cap"];
        assert_eq!(remove_duplicate_captions(&lines), vec!["![Cap](x.png)\n"]);
    }

    #[test]
    fn test_caption_removal_is_idempotent() {
        let text = "![A](a.png)\n\nA\n![B](b.png)\nnot b\n![C](c.png)\n\n\nC\n\n";
        let lines = split_lines(text);
        let once = remove_duplicate_captions(&lines);
        let twice = remove_duplicate_captions(&once);
        assert_eq!(once, twice);
    }

    // ── Heading bold ─────────────────────────────────────────────────────

    #[test]
    fn test_heading_bold_stripped() {
        assert_eq!(strip_heading_bold_line("### **Title**\n"), "### Title\n");
        assert_eq!(strip_heading_bold_line("# **T**"), "# T");
    }

    #[test]
    fn test_heading_bold_only_first_span() {
        assert_eq!(
            strip_heading_bold_line("## **A** and **B**\n"),
            "## A and **B**\n"
        );
    }

    #[test]
    fn test_heading_bold_keeps_suffix_text() {
        assert_eq!(
            strip_heading_bold_line("##  **Intro**: part 1\n"),
            "##  Intro: part 1\n"
        );
    }

    #[test]
    fn test_bold_not_directly_after_marker_untouched() {
        for line in [
            "## Title **bold**\n",
            "**Bold** paragraph\n",
            "###**Tight**\n",
            "## **unterminated\n",
        ] {
            assert!(
                matches!(strip_heading_bold_line(line), Cow::Borrowed(l) if l == line),
                "line = {line:?}"
            );
        }
    }

    // ── Whole normaliser ─────────────────────────────────────────────────

    #[test]
    fn test_empty_input_rejected() {
        let err = normalize(&[], true).unwrap_err();
        assert!(matches!(err, Notion2TexError::EmptyInput));
    }

    #[test]
    fn test_bold_flag_controls_pass_three() {
        assert_eq!(clean("Intro\n### **Title**\n", true), "Intro\n### Title\n");
        assert_eq!(
            clean("Intro\n### **Title**\n", false),
            "Intro\n### **Title**\n"
        );
    }

    #[test]
    fn test_full_notion_export() {
        let input = "# Trip Report\n\
                     ## **Day 1**\n\
                     \n\
                     ![Harbour at dawn](Trip%20Report/img1.png)\n\
                     \n\
                     Harbour at dawn\n\
                     \n\
                     We walked.\n";
        let lines = split_lines(input);
        let out = normalize(&lines, true).unwrap();
        assert_eq!(
            out.to_text(),
            "## Day 1\n\
             \n\
             ![Harbour at dawn](Trip%20Report/img1.png)\n\
             \n\
             \n\
             We walked.\n"
        );
        assert_eq!(
            out.stats,
            CleaningStats {
                input_lines: 8,
                output_lines: 6,
                title_removed: true,
                captions_removed: 1,
                headings_unbolded: 1,
            }
        );
    }

    #[test]
    fn test_title_only_document_cleans_to_nothing() {
        let lines = ["# Only a title\n"];
        let out = normalize(&lines, false).unwrap();
        assert!(out.lines.is_empty());
        assert!(out.stats.title_removed);
    }

    #[test]
    fn test_unchanged_lines_are_borrowed() {
        let lines = ["Plain\n", "## **Bold**\n"];
        let out = normalize(&lines, true).unwrap();
        assert!(matches!(out.lines[0], Cow::Borrowed("Plain\n")));
        assert!(matches!(out.lines[1], Cow::Owned(_)));
    }
}
