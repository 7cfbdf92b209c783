//! # document: in-memory report model and its assembly
//!
//! A [`Document`] is always three [`DocumentZone`]s: cover, front matter and
//! main body. Each zone restarts page numbering at 1 in its own format and
//! carries its own header, footer and margins. The model is format-agnostic;
//! [`crate::docx`] turns it into bytes.
//!
//! Measurements follow word-processor conventions: font sizes in half-points,
//! spacing, indents and margins in twips (1/20 pt).

use chrono::Datelike;

use crate::config::ReportConfig;
use crate::format::{format_paragraphs, Alignment, FormattedParagraph};
use crate::synthesis::ChapterContent;
use crate::toc::TocEntry;

/// One inch.
pub const DEFAULT_MARGIN: u32 = 1440;

/// Position of the right-aligned dot-leader tab in table-of-contents lines.
pub const TOC_TAB_POSITION: u32 = 9000;

const TITLE_SIZE: u32 = 28;
const BODY_SIZE: u32 = 24;

pub const REFERENCE_LINES: [&str; 5] = [
    "1. https://docs.oracle.com/javase/ - Official Java documentation",
    "2. https://reactjs.org/ - React JavaScript library documentation",
    "3. https://nodejs.org/ - Node.js runtime environment",
    "4. https://developer.mozilla.org/ - Web development resources",
    "5. https://www.python.org/ - Python programming language",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Cover,
    FrontMatter,
    MainBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumberFormat {
    None,
    LowerRoman,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    pub fn uniform(twips: u32) -> Self {
        Margins {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabLeader {
    None,
    Dot,
}

/// A right-aligned tab stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStop {
    pub position: u32,
    pub leader: TabLeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Tab,
    /// The current page number, rendered by the word processor.
    PageNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub content: RunContent,
    pub bold: bool,
    /// Half-points.
    pub size: u32,
}

impl Run {
    pub fn text(text: impl Into<String>, size: u32, bold: bool) -> Self {
        Run {
            content: RunContent::Text(text.into()),
            bold,
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub spacing_before: u32,
    pub spacing_after: u32,
    /// Line spacing; `None` inherits the document default.
    pub line: Option<u32>,
    pub indent_left: u32,
    pub tab_stop: Option<TabStop>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Paragraph {
            runs,
            alignment: Alignment::Left,
            spacing_before: 0,
            spacing_after: 0,
            line: None,
            indent_left: 0,
            tab_stop: None,
        }
    }

    /// A paragraph holding a single text run.
    pub fn text(text: impl Into<String>, size: u32, bold: bool) -> Self {
        Self::new(vec![Run::text(text, size, bold)])
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Concatenated text of all text runs; tabs become `\t`.
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|r| match &r.content {
                RunContent::Text(t) => Some(t.as_str()),
                RunContent::Tab => Some("\t"),
                RunContent::PageNumber => None,
            })
            .collect()
    }
}

impl From<FormattedParagraph> for Paragraph {
    fn from(p: FormattedParagraph) -> Self {
        Paragraph {
            runs: vec![Run::text(p.text, p.font_size.half_points(), p.emphasis)],
            alignment: p.alignment,
            spacing_before: p.spacing_before,
            spacing_after: p.spacing_after,
            line: Some(360),
            indent_left: p.indent,
            tab_stop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    PageBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentZone {
    pub kind: ZoneKind,
    pub numbering: PageNumberFormat,
    pub margins: Margins,
    pub header: Vec<Paragraph>,
    pub footer: Vec<Paragraph>,
    pub blocks: Vec<Block>,
}

impl DocumentZone {
    fn new(kind: ZoneKind, numbering: PageNumberFormat) -> Self {
        DocumentZone {
            kind,
            numbering,
            margins: Margins::default(),
            header: Vec::new(),
            footer: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    fn extend(&mut self, paragraphs: impl IntoIterator<Item = Paragraph>) {
        self.blocks
            .extend(paragraphs.into_iter().map(Block::Paragraph));
    }

    fn page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::PageBreak => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub zones: Vec<DocumentZone>,
}

impl Document {
    pub fn zone(&self, kind: ZoneKind) -> Option<&DocumentZone> {
        self.zones.iter().find(|z| z.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Repeat the project title in front-matter and main-body headers.
    pub echo_title_in_header: bool,
    /// Year printed on the cover and certificate.
    pub year: i32,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        AssemblyOptions {
            echo_title_in_header: false,
            year: chrono::Local::now().year(),
        }
    }
}

fn centered(text: impl Into<String>, size: u32, bold: bool) -> Paragraph {
    Paragraph::text(text, size, bold).aligned(Alignment::Center)
}

fn page_heading(text: &str) -> Paragraph {
    centered(text, TITLE_SIZE, true).spacing(480, 480)
}

/// Justified front-matter prose. The last paragraph of a page gets more room after it.
fn prose(text: String, last: bool) -> Paragraph {
    Paragraph::text(text, BODY_SIZE, false)
        .aligned(Alignment::Justified)
        .spacing(360, if last { 720 } else { 360 })
        .line(360)
}

fn page_number_footer() -> Vec<Paragraph> {
    vec![Paragraph::new(vec![Run {
        content: RunContent::PageNumber,
        bold: false,
        size: BODY_SIZE,
    }])
    .aligned(Alignment::Right)]
}

fn title_header(config: &ReportConfig, options: &AssemblyOptions) -> Vec<Paragraph> {
    if !options.echo_title_in_header {
        return Vec::new();
    }
    vec![Paragraph::text(config.project_title.clone(), 20, false).aligned(Alignment::Right)]
}

fn cover_zone(config: &ReportConfig, options: &AssemblyOptions) -> DocumentZone {
    let mut zone = DocumentZone::new(ZoneKind::Cover, PageNumberFormat::None);
    zone.extend([
        centered(config.institution.to_uppercase(), 32, true).spacing(720, 240),
        centered(config.department.clone(), TITLE_SIZE, true).spacing(0, 720),
        centered(config.project_title.to_uppercase(), 36, true).spacing(1440, 1440),
        centered(format!("A {}", config.report_type.to_uppercase()), TITLE_SIZE, true)
            .spacing(0, 720),
        centered("Submitted by:", BODY_SIZE, false).spacing(0, 120),
        centered(config.student_name.clone(), TITLE_SIZE, true).spacing(0, 120),
        centered(format!("Student ID: {}", config.student_id), BODY_SIZE, false).spacing(0, 240),
        centered(config.course.clone(), BODY_SIZE, false).spacing(0, 120),
        centered(config.semester.clone(), BODY_SIZE, false).spacing(0, 720),
        centered("Under the guidance of:", BODY_SIZE, false).spacing(0, 120),
        centered(config.supervisor.clone(), TITLE_SIZE, true).spacing(0, 720),
        centered(options.year.to_string(), TITLE_SIZE, true).spacing(720, 0),
    ]);
    zone
}

fn toc_line(entry: &TocEntry) -> Paragraph {
    Paragraph {
        runs: vec![
            Run::text(entry.label.clone(), BODY_SIZE, entry.bold),
            Run {
                content: RunContent::Tab,
                bold: false,
                size: BODY_SIZE,
            },
            Run::text(entry.page_range.clone(), BODY_SIZE, entry.bold),
        ],
        alignment: Alignment::Left,
        spacing_before: 0,
        spacing_after: 60,
        line: Some(240),
        indent_left: entry.indent_level * 360,
        tab_stop: Some(TabStop {
            position: TOC_TAB_POSITION,
            leader: TabLeader::Dot,
        }),
    }
}

fn front_matter_zone(
    config: &ReportConfig,
    toc: &[TocEntry],
    options: &AssemblyOptions,
) -> DocumentZone {
    let report_type = config.report_type.to_lowercase();
    let mut zone = DocumentZone::new(ZoneKind::FrontMatter, PageNumberFormat::LowerRoman);
    zone.header = title_header(config, options);
    zone.footer = page_number_footer();

    zone.extend([
        page_heading("TRAINING CERTIFICATE"),
        prose(
            format!(
                "This is to certify that {} (Student ID: {}) has successfully completed the {} work on \"{}\" \
                 as part of the curriculum for {} at {}.",
                config.student_name,
                config.student_id,
                report_type,
                config.project_title,
                config.course,
                config.institution
            ),
            false,
        ),
        prose(
            format!(
                "The work was carried out under the supervision of {} during the academic year {}.",
                config.supervisor, options.year
            ),
            true,
        ),
    ]);
    zone.page_break();

    zone.extend([
        page_heading("ACKNOWLEDGEMENT"),
        prose(
            format!(
                "I would like to express my sincere gratitude to my supervisor, {}, for their valuable guidance, \
                 continuous support, and encouragement throughout the development of this {}.",
                config.supervisor, report_type
            ),
            false,
        ),
        prose(
            format!(
                "I am also thankful to the faculty members of {}, {}, for their support and for providing \
                 the necessary resources and facilities required for this work.",
                config.department, config.institution
            ),
            true,
        ),
    ]);
    zone.page_break();

    zone.extend([
        page_heading("ABSTRACT"),
        prose(
            format!(
                "This {} presents the comprehensive study and implementation of \"{}\". {}",
                config.report_type, config.project_title, config.project_description
            ),
            false,
        ),
        prose(
            "The methodology involves systematic analysis, design, implementation, and evaluation. \
             The work demonstrates practical application of modern technologies and methodologies."
                .to_string(),
            true,
        ),
    ]);
    zone.page_break();

    zone.push(page_heading("TABLE OF CONTENTS"));
    zone.extend(toc.iter().map(toc_line));
    zone
}

fn main_body_zone(
    config: &ReportConfig,
    chapters: &[ChapterContent],
    options: &AssemblyOptions,
) -> DocumentZone {
    let mut zone = DocumentZone::new(ZoneKind::MainBody, PageNumberFormat::Decimal);
    zone.header = title_header(config, options);
    zone.footer = page_number_footer();

    for (i, chapter) in chapters.iter().enumerate() {
        if i > 0 {
            zone.page_break();
        }
        zone.push(centered(chapter.title.clone(), TITLE_SIZE, true).spacing(480, 240));
        zone.extend(format_paragraphs(&chapter.body).into_iter().map(Paragraph::from));
    }

    zone.page_break();
    zone.push(centered("REFERENCES", TITLE_SIZE, true).spacing(480, 240));
    zone.extend(
        format_paragraphs(&REFERENCE_LINES.join("\n"))
            .into_iter()
            .map(Paragraph::from),
    );
    zone
}

/// Composes the three-zone document from validated config, synthesized
/// chapters (in plan order) and the table of contents for the same plan.
pub fn assemble(
    config: &ReportConfig,
    chapters: &[ChapterContent],
    toc: &[TocEntry],
    options: &AssemblyOptions,
) -> Document {
    Document {
        zones: vec![
            cover_zone(config, options),
            front_matter_zone(config, toc, options),
            main_body_zone(config, chapters, options),
        ],
    }
}
