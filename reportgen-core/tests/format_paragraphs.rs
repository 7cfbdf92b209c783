use pretty_assertions::assert_eq;

use reportgen_core::format::{
    classify_line, format_paragraphs, Alignment, FontSize, ParagraphKind,
};

#[test]
fn numbered_subsection_is_a_left_heading() {
    let p = classify_line("3.2 Something");
    assert_eq!(p.kind, ParagraphKind::SectionHeading);
    assert_eq!(p.alignment, Alignment::Left);
    assert!(p.emphasis);
    assert_eq!(p.font_size, FontSize::Large);
    assert_eq!((p.spacing_before, p.spacing_after), (360, 240));
}

#[test]
fn front_matter_keyword_is_a_centred_heading() {
    let p = classify_line("ABSTRACT");
    assert_eq!(p.kind, ParagraphKind::FrontMatterHeading);
    assert_eq!(p.alignment, Alignment::Center);
    assert_eq!(p.spacing_before, 480);

    // Only exact matches count.
    assert_eq!(classify_line("Abstract").kind, ParagraphKind::Body);
}

#[test]
fn numbered_url_is_a_reference() {
    let p = classify_line("1. https://example.com - desc");
    assert_eq!(p.kind, ParagraphKind::Reference);
    assert_eq!(p.alignment, Alignment::Left);
    assert_eq!(p.indent, 360);
    assert!(!p.emphasis);
}

#[test]
fn anything_else_is_justified_body() {
    let p = classify_line("The system stores every order.");
    assert_eq!(p.kind, ParagraphKind::Body);
    assert_eq!(p.alignment, Alignment::Justified);
    assert_eq!(p.font_size, FontSize::Normal);
    assert_eq!((p.spacing_before, p.spacing_after, p.indent), (0, 120, 0));

    // A numbered list item without a URL is still body text.
    assert_eq!(classify_line("1. Gather requirements").kind, ParagraphKind::Body);
}

#[test]
fn blank_lines_are_dropped_and_order_is_kept() {
    let text = "1.1 Background\n\n   \n  First paragraph.  \nSecond paragraph.\n\nREFERENCES\n2. http://a.example";
    let kinds: Vec<(String, ParagraphKind)> = format_paragraphs(text)
        .into_iter()
        .map(|p| (p.text, p.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("1.1 Background".to_string(), ParagraphKind::SectionHeading),
            ("First paragraph.".to_string(), ParagraphKind::Body),
            ("Second paragraph.".to_string(), ParagraphKind::Body),
            ("REFERENCES".to_string(), ParagraphKind::FrontMatterHeading),
            ("2. http://a.example".to_string(), ParagraphKind::Reference),
        ]
    );
}
