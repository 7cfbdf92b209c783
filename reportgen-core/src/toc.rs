//! Table-of-contents synthesis.
//!
//! Page numbers are estimated from the length tier's pages-per-chapter figure,
//! never from rendered layout.

use serde::{Deserialize, Serialize};

use crate::planner::ChapterPlan;

/// Front-matter lines listed before the chapters, with their roman page labels.
const FRONT_MATTER_ENTRIES: [(&str, &str); 6] = [
    ("Training Certificate", "i"),
    ("Acknowledgement", "ii"),
    ("Abstract", "iii"),
    ("Table of Contents", "iv-v"),
    ("List of Tables", "vi"),
    ("List of Figures", "vii"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TocEntryKind {
    FrontMatter,
    Chapter,
    Subsection,
    References,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub label: String,
    /// `"start-end"` for chapters, a single page otherwise.
    pub page_range: String,
    pub bold: bool,
    /// 0 for top-level entries, 1 for subsections.
    pub indent_level: u32,
    pub kind: TocEntryKind,
}

impl TocEntry {
    /// Start and end page of a chapter entry's `"start-end"` range.
    pub fn chapter_span(&self) -> Option<(u32, u32)> {
        if self.kind != TocEntryKind::Chapter {
            return None;
        }
        let (start, end) = self.page_range.split_once('-')?;
        Some((start.parse().ok()?, end.parse().ok()?))
    }
}

/// Computes the full table of contents for `plan`.
pub fn synthesize_toc(plan: &ChapterPlan) -> Vec<TocEntry> {
    let pages_per_chapter = plan.pages_per_chapter();
    let subsections = plan.subsection_titles();
    let pages_per_subsection = pages_per_chapter / subsections.len() as u32;

    let mut entries: Vec<TocEntry> = FRONT_MATTER_ENTRIES
        .iter()
        .map(|(label, page)| TocEntry {
            label: label.to_string(),
            page_range: page.to_string(),
            bold: false,
            indent_level: 0,
            kind: TocEntryKind::FrontMatter,
        })
        .collect();

    let mut page_start = 1;
    for chapter in &plan.chapters {
        let page_end = page_start + pages_per_chapter - 1;
        entries.push(TocEntry {
            label: format!("Chapter {}: {}", chapter.number, chapter.title),
            page_range: format!("{page_start}-{page_end}"),
            bold: true,
            indent_level: 0,
            kind: TocEntryKind::Chapter,
        });

        let mut sub_start = page_start;
        for (index, subsection) in subsections.iter().enumerate() {
            let sub_end = (sub_start + pages_per_subsection).saturating_sub(1).min(page_end);
            entries.push(TocEntry {
                label: format!("{}.{} {}", chapter.number, index + 1, subsection),
                page_range: sub_start.to_string(),
                bold: false,
                indent_level: 1,
                kind: TocEntryKind::Subsection,
            });
            sub_start = sub_end + 1;
        }

        page_start = page_end + 1;
    }

    entries.push(TocEntry {
        label: "References".to_string(),
        page_range: page_start.to_string(),
        bold: true,
        indent_level: 0,
        kind: TocEntryKind::References,
    });

    entries
}

/// The chapter entries only, in order.
pub fn chapter_entries(entries: &[TocEntry]) -> impl Iterator<Item = &TocEntry> {
    entries.iter().filter(|e| e.kind == TocEntryKind::Chapter)
}
