//! Serializes a [`Document`] into a WordprocessingML (`.docx`) package.
//!
//! Every zone becomes one section with its own header part, footer part and
//! `w:pgNumType` restart. The package is built fully in memory.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::{
    Block, Document, DocumentZone, PageNumberFormat, Paragraph, Run, RunContent, TabLeader,
};
use crate::error::SerializeError;
use crate::format::Alignment;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

/// A4 in twips.
const PAGE_WIDTH: &str = "11906";
const PAGE_HEIGHT: &str = "16838";

pub const DEFAULT_FONT: &str = "Times New Roman";

/// Thin wrapper so every write goes through `?` with our error type.
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self, SerializeError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(XmlPart { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        check_attributes(attrs)?;
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(tag))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        check_attributes(attrs)?;
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(tag))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), SerializeError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), SerializeError> {
        check_chars(text)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Rejects characters outside the XML 1.0 `Char` production. quick-xml only
/// escapes markup, so these would otherwise produce a part Word cannot open.
fn check_chars(text: &str) -> Result<(), SerializeError> {
    let invalid = text.chars().find(|c| match *c {
        '\t' | '\n' | '\r' => false,
        '\u{FFFE}' | '\u{FFFF}' => true,
        c => c < '\u{20}',
    });
    match invalid {
        Some(c) => Err(SerializeError::InvalidChar { code: c as u32 }),
        None => Ok(()),
    }
}

fn check_attributes(attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
    attrs.iter().try_for_each(|(_, value)| check_chars(value))
}

fn justification(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justified => "both",
    }
}

fn number_format(format: PageNumberFormat) -> &'static str {
    match format {
        PageNumberFormat::None => "none",
        PageNumberFormat::LowerRoman => "lowerRoman",
        PageNumberFormat::Decimal => "decimal",
    }
}

fn write_run_properties(xml: &mut XmlPart, run: &Run) -> Result<(), SerializeError> {
    let size = run.size.to_string();
    xml.start("w:rPr", &[])?;
    if run.bold {
        xml.empty("w:b", &[])?;
    }
    xml.empty("w:sz", &[("w:val", &size)])?;
    xml.empty("w:szCs", &[("w:val", &size)])?;
    xml.end("w:rPr")
}

fn write_run(xml: &mut XmlPart, run: &Run) -> Result<(), SerializeError> {
    match &run.content {
        RunContent::PageNumber => {
            xml.start("w:fldSimple", &[("w:instr", " PAGE ")])?;
            xml.start("w:r", &[])?;
            write_run_properties(xml, run)?;
            xml.start("w:t", &[])?;
            xml.text("1")?;
            xml.end("w:t")?;
            xml.end("w:r")?;
            xml.end("w:fldSimple")
        }
        RunContent::Tab => {
            xml.start("w:r", &[])?;
            write_run_properties(xml, run)?;
            xml.empty("w:tab", &[])?;
            xml.end("w:r")
        }
        RunContent::Text(text) => {
            xml.start("w:r", &[])?;
            write_run_properties(xml, run)?;
            xml.start("w:t", &[("xml:space", "preserve")])?;
            xml.text(text)?;
            xml.end("w:t")?;
            xml.end("w:r")
        }
    }
}

fn write_paragraph(xml: &mut XmlPart, p: &Paragraph) -> Result<(), SerializeError> {
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;

    if let Some(tab) = &p.tab_stop {
        let pos = tab.position.to_string();
        let leader = match tab.leader {
            TabLeader::None => "none",
            TabLeader::Dot => "dot",
        };
        xml.start("w:tabs", &[])?;
        xml.empty(
            "w:tab",
            &[("w:val", "right"), ("w:leader", leader), ("w:pos", &pos)],
        )?;
        xml.end("w:tabs")?;
    }

    let before = p.spacing_before.to_string();
    let after = p.spacing_after.to_string();
    match p.line {
        Some(line) => {
            let line = line.to_string();
            xml.empty(
                "w:spacing",
                &[
                    ("w:before", &before),
                    ("w:after", &after),
                    ("w:line", &line),
                    ("w:lineRule", "auto"),
                ],
            )?;
        }
        None => xml.empty("w:spacing", &[("w:before", &before), ("w:after", &after)])?,
    }

    if p.indent_left > 0 {
        let left = p.indent_left.to_string();
        xml.empty("w:ind", &[("w:left", &left)])?;
    }
    xml.empty("w:jc", &[("w:val", justification(p.alignment))])?;
    xml.end("w:pPr")?;

    for run in &p.runs {
        write_run(xml, run)?;
    }
    xml.end("w:p")
}

fn write_page_break(xml: &mut XmlPart) -> Result<(), SerializeError> {
    xml.start("w:p", &[])?;
    xml.start("w:r", &[])?;
    xml.empty("w:br", &[("w:type", "page")])?;
    xml.end("w:r")?;
    xml.end("w:p")
}

/// Relationship ids of a zone's header and footer parts.
fn part_ids(index: usize) -> (String, String) {
    (format!("rIdHeader{}", index + 1), format!("rIdFooter{}", index + 1))
}

fn write_section_properties(
    xml: &mut XmlPart,
    zone: &DocumentZone,
    index: usize,
) -> Result<(), SerializeError> {
    let (header_id, footer_id) = part_ids(index);
    let m = &zone.margins;
    let (top, right, bottom, left) = (
        m.top.to_string(),
        m.right.to_string(),
        m.bottom.to_string(),
        m.left.to_string(),
    );

    xml.start("w:sectPr", &[])?;
    xml.empty(
        "w:headerReference",
        &[("w:type", "default"), ("r:id", &header_id)],
    )?;
    xml.empty(
        "w:footerReference",
        &[("w:type", "default"), ("r:id", &footer_id)],
    )?;
    xml.empty("w:pgSz", &[("w:w", PAGE_WIDTH), ("w:h", PAGE_HEIGHT)])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.empty(
        "w:pgNumType",
        &[("w:fmt", number_format(zone.numbering)), ("w:start", "1")],
    )?;
    xml.end("w:sectPr")
}

fn document_part(doc: &Document) -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
    xml.start("w:body", &[])?;

    let last = doc.zones.len().saturating_sub(1);
    for (index, zone) in doc.zones.iter().enumerate() {
        for block in &zone.blocks {
            match block {
                Block::Paragraph(p) => write_paragraph(&mut xml, p)?,
                Block::PageBreak => write_page_break(&mut xml)?,
            }
        }
        // A section ends at the paragraph carrying its sectPr; the final
        // section's properties are the last child of the body instead.
        if index < last {
            xml.start("w:p", &[])?;
            xml.start("w:pPr", &[])?;
            write_section_properties(&mut xml, zone, index)?;
            xml.end("w:pPr")?;
            xml.end("w:p")?;
        } else {
            write_section_properties(&mut xml, zone, index)?;
        }
    }

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn header_footer_part(root: &str, paragraphs: &[Paragraph]) -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start(root, &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
    if paragraphs.is_empty() {
        xml.empty("w:p", &[])?;
    }
    for p in paragraphs {
        write_paragraph(&mut xml, p)?;
    }
    xml.end(root)?;
    Ok(xml.finish())
}

fn styles_part() -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_W)])?;
    xml.start("w:docDefaults", &[])?;
    xml.start("w:rPrDefault", &[])?;
    xml.start("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", DEFAULT_FONT),
            ("w:hAnsi", DEFAULT_FONT),
            ("w:cs", DEFAULT_FONT),
            ("w:eastAsia", DEFAULT_FONT),
        ],
    )?;
    xml.empty("w:sz", &[("w:val", "24")])?;
    xml.empty("w:szCs", &[("w:val", "24")])?;
    xml.end("w:rPr")?;
    xml.end("w:rPrDefault")?;
    xml.start("w:pPrDefault", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:line", "360"), ("w:lineRule", "auto")])?;
    xml.end("w:pPr")?;
    xml.end("w:pPrDefault")?;
    xml.end("w:docDefaults")?;

    xml.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.end("w:style")?;

    xml.end("w:styles")?;
    Ok(xml.finish())
}

fn settings_part() -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start("w:settings", &[("xmlns:w", NS_W)])?;
    xml.empty("w:defaultTabStop", &[("w:val", "720")])?;
    xml.empty("w:characterSpacingControl", &[("w:val", "doNotCompress")])?;
    xml.end("w:settings")?;
    Ok(xml.finish())
}

fn content_types_part(zone_count: usize) -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut overrides = vec![
        ("/word/document.xml".to_string(), format!("{CT_BASE}.document.main+xml")),
        ("/word/styles.xml".to_string(), format!("{CT_BASE}.styles+xml")),
        ("/word/settings.xml".to_string(), format!("{CT_BASE}.settings+xml")),
    ];
    for i in 1..=zone_count {
        overrides.push((format!("/word/header{i}.xml"), format!("{CT_BASE}.header+xml")));
        overrides.push((format!("/word/footer{i}.xml"), format!("{CT_BASE}.footer+xml")));
    }
    for (part, content_type) in &overrides {
        xml.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", content_type.as_str())],
        )?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

fn relationships_part(rels: &[(String, String, String)]) -> Result<Vec<u8>, SerializeError> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_RELS)])?;
    for (id, kind, target) in rels {
        let rel_type = format!("{REL_BASE}/{kind}");
        xml.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", rel_type.as_str()), ("Target", target.as_str())],
        )?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn package_rels() -> Result<Vec<u8>, SerializeError> {
    relationships_part(&[(
        "rId1".to_string(),
        "officeDocument".to_string(),
        "word/document.xml".to_string(),
    )])
}

fn document_rels(zone_count: usize) -> Result<Vec<u8>, SerializeError> {
    let mut rels = vec![
        ("rIdStyles".to_string(), "styles".to_string(), "styles.xml".to_string()),
        ("rIdSettings".to_string(), "settings".to_string(), "settings.xml".to_string()),
    ];
    for index in 0..zone_count {
        let (header_id, footer_id) = part_ids(index);
        rels.push((header_id, "header".to_string(), format!("header{}.xml", index + 1)));
        rels.push((footer_id, "footer".to_string(), format!("footer{}.xml", index + 1)));
    }
    relationships_part(&rels)
}

/// Renders `doc` into the bytes of a `.docx` file.
pub fn to_docx(doc: &Document) -> Result<Vec<u8>, SerializeError> {
    let zone_count = doc.zones.len();
    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".to_string(), content_types_part(zone_count)?),
        ("_rels/.rels".to_string(), package_rels()?),
        ("word/_rels/document.xml.rels".to_string(), document_rels(zone_count)?),
        ("word/document.xml".to_string(), document_part(doc)?),
        ("word/styles.xml".to_string(), styles_part()?),
        ("word/settings.xml".to_string(), settings_part()?),
    ];
    for (index, zone) in doc.zones.iter().enumerate() {
        let n = index + 1;
        parts.push((format!("word/header{n}.xml"), header_footer_part("w:hdr", &zone.header)?));
        parts.push((format!("word/footer{n}.xml"), header_footer_part("w:ftr", &zone.footer)?));
    }

    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in &parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(bytes)?;
    }
    let bytes = zip.finish()?.into_inner();

    debug!(parts = parts.len(), size = bytes.len(), "Serialized docx package");
    Ok(bytes)
}
