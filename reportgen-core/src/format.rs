//! Line-by-line classification of chapter text into styled paragraphs.
//!
//! Each non-blank line becomes exactly one [`FormattedParagraph`]; classification
//! looks at that line alone, so the output is order-preserving and stateless.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Headings that are centred when they occur in running text.
pub const FRONT_MATTER_HEADINGS: [&str; 5] = [
    "TRAINING CERTIFICATE",
    "ACKNOWLEDGEMENT",
    "ABSTRACT",
    "REFERENCES",
    "LIST OF CONTENTS",
];

static SUBSECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+").expect("valid regex"));
static REFERENCE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*https?://").expect("valid regex"));
static CHAPTER_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(#+\s*)?chapter \d+:").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParagraphKind {
    SectionHeading,
    FrontMatterHeading,
    Body,
    Reference,
}

impl ParagraphKind {
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            ParagraphKind::SectionHeading | ParagraphKind::FrontMatterHeading
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    /// 14pt.
    Large,
    /// 12pt.
    Normal,
}

impl FontSize {
    pub fn half_points(self) -> u32 {
        match self {
            FontSize::Large => 28,
            FontSize::Normal => 24,
        }
    }
}

/// Spacing and indents are in twentieths of a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedParagraph {
    pub text: String,
    pub kind: ParagraphKind,
    pub alignment: Alignment,
    pub emphasis: bool,
    pub font_size: FontSize,
    pub spacing_before: u32,
    pub spacing_after: u32,
    pub indent: u32,
}

/// Classifies one already-trimmed, non-empty line.
pub fn classify_line(line: &str) -> FormattedParagraph {
    let text = line.to_string();
    let is_front_matter = FRONT_MATTER_HEADINGS.contains(&line);

    if is_front_matter || SUBSECTION_HEADING.is_match(line) {
        let (kind, alignment, spacing_before) = if is_front_matter {
            (ParagraphKind::FrontMatterHeading, Alignment::Center, 480)
        } else {
            (ParagraphKind::SectionHeading, Alignment::Left, 360)
        };
        return FormattedParagraph {
            text,
            kind,
            alignment,
            emphasis: true,
            font_size: FontSize::Large,
            spacing_before,
            spacing_after: 240,
            indent: 0,
        };
    }

    let (kind, alignment, indent) = if REFERENCE_LINE.is_match(line) {
        (ParagraphKind::Reference, Alignment::Left, 360)
    } else {
        (ParagraphKind::Body, Alignment::Justified, 0)
    };
    FormattedParagraph {
        text,
        kind,
        alignment,
        emphasis: false,
        font_size: FontSize::Normal,
        spacing_before: 0,
        spacing_after: 120,
        indent,
    }
}

/// Splits `text` on newlines, drops blank lines and classifies the rest.
pub fn format_paragraphs(text: &str) -> Vec<FormattedParagraph> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

/// Removes `Chapter n:` lines (optionally markdown-prefixed) that generated text
/// tends to repeat; the assembler writes chapter headings itself.
pub fn strip_chapter_headings(text: &str) -> String {
    text.lines()
        .filter(|line| !CHAPTER_HEADING.is_match(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
