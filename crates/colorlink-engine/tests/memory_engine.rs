//! Behavior of the in-memory engine as seen through the capability traits.

use colorlink_engine::memory::{Capability, ExportBlock, MemoryDocument, Position};
use colorlink_engine::properties::{CHAR_COLOR, HYPERLINK_URL};
use colorlink_engine::{
    Closeable, ParagraphElement, PropertyValue, RegionOrder, Storable, Text, TextCursor,
    TextDocument, TextRange, WordCursor,
};
use pretty_assertions::assert_eq;

fn first_paragraph(doc: &MemoryDocument) -> colorlink_engine::memory::MemoryRange {
    doc.text()
        .paragraphs()
        .and_then(|mut p| p.next())
        .and_then(|e| e.as_text_range())
        .expect("paragraph range")
}

/// Walks a paragraph the same way the overlay does and collects each selection.
fn walk_words(doc: &MemoryDocument) -> Vec<String> {
    let text = doc.text();
    let paragraph = first_paragraph(doc);
    let mut cursor = text.create_word_cursor_by_range(&paragraph).unwrap();
    let compare = text.as_range_compare().unwrap();

    let mut words = Vec::new();
    loop {
        cursor.goto_start_of_word(false);
        cursor.goto_end_of_word(true);
        words.push(cursor.string());
        cursor.goto_next_word(false);
        let order = compare
            .compare_region_starts(&cursor.start(), &paragraph.end())
            .unwrap();
        if order != RegionOrder::Before {
            break;
        }
    }
    words
}

#[test]
fn word_walk_selects_each_word() {
    let doc = MemoryDocument::from_paragraphs(["The quick brown fox jumps"]);
    assert_eq!(
        walk_words(&doc),
        vec!["The", "quick", "brown", "fox", "jumps"]
    );
}

#[test]
fn word_walk_skips_punctuation() {
    let doc = MemoryDocument::from_paragraphs(["Hello, world! Again."]);
    assert_eq!(walk_words(&doc), vec!["Hello", "world", "Again"]);
}

#[test]
fn next_word_reports_movement_past_last_word() {
    let doc = MemoryDocument::from_paragraphs(["solo"]);
    let text = doc.text();
    let mut cursor = text
        .create_word_cursor_by_range(&first_paragraph(&doc))
        .unwrap();
    cursor.goto_start_of_word(false);
    cursor.goto_end_of_word(true);
    // head already sits on the paragraph end
    assert!(!cursor.goto_next_word(false));

    let doc = MemoryDocument::from_paragraphs(["solo "]);
    let text = doc.text();
    let mut cursor = text
        .create_word_cursor_by_range(&first_paragraph(&doc))
        .unwrap();
    cursor.goto_end_of_word(false);
    assert!(cursor.goto_next_word(false));
    assert_eq!(cursor.start().start_position(), Position::new(0, 5));
}

#[test]
fn stalled_next_word_reports_true_without_moving() {
    let doc = MemoryDocument::builder()
        .paragraph("alpha beta.")
        .disable(Capability::NextWordPastEnd)
        .build();
    let text = doc.text();
    let mut cursor = text
        .create_word_cursor_by_range(&first_paragraph(&doc))
        .unwrap();

    assert!(cursor.goto_next_word(false));
    assert_eq!(cursor.start().start_position(), Position::new(0, 6));

    cursor.goto_end_of_word(false);
    assert!(cursor.goto_next_word(false));
    assert_eq!(cursor.start().start_position(), Position::new(0, 10));
    cursor.goto_start_of_word(false);
    cursor.goto_end_of_word(true);
    assert_eq!(cursor.string(), "beta");
}

#[test]
fn span_cursor_sets_properties_across_words() {
    let doc = MemoryDocument::from_paragraphs(["The quick brown fox"]);
    let text = doc.text();
    let paragraph = first_paragraph(&doc);
    let mut words = text.create_word_cursor_by_range(&paragraph).unwrap();

    words.goto_next_word(false);
    words.goto_start_of_word(false);
    let start = words.start();
    words.goto_next_word(false);
    words.goto_end_of_word(false);

    let mut span = text.create_text_cursor();
    span.goto_range(&start, false);
    span.goto_range(&words.end(), true);
    span.as_property_set()
        .unwrap()
        .set_property_value(HYPERLINK_URL, PropertyValue::string("term://000201"))
        .unwrap();

    let range = span.as_text_range().unwrap();
    assert_eq!(range.string(), "quick brown");

    let links = doc.hyperlinks();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].text, "quick brown");
    assert_eq!(links[0].url, "term://000201");
}

#[test]
fn word_properties_round_trip_through_cursor() {
    let doc = MemoryDocument::from_paragraphs(["red green"]);
    let text = doc.text();
    let mut cursor = text
        .create_word_cursor_by_range(&first_paragraph(&doc))
        .unwrap();
    cursor.goto_start_of_word(false);
    cursor.goto_end_of_word(true);
    let props = cursor.as_property_set().unwrap();
    props
        .set_property_value(CHAR_COLOR, PropertyValue::color(0x00_02_00))
        .unwrap();

    assert_eq!(
        props.property_value(CHAR_COLOR).unwrap(),
        PropertyValue::color(0x00_02_00)
    );
    assert_eq!(doc.word_colors(0), vec![Some(0x00_02_00), None]);
}

#[test]
fn markup_builds_tables_between_paragraphs() {
    let doc = MemoryDocument::from_markup("intro\n| a | b |\n| c | d |\noutro");
    assert_eq!(doc.block_count(), 3);

    let text = doc.text();
    let elements: Vec<_> = text.paragraphs().unwrap().collect();
    assert!(elements[0].as_text_range().is_some());
    let table = elements[1].as_text_table().expect("table");
    assert_eq!(table.name(), "Table1");
    assert!(elements[1].as_text_range().is_none());
    assert_eq!(elements[2].as_text_range().unwrap().string(), "outro");
}

#[test]
fn disabled_capabilities_are_not_offered() {
    let doc = MemoryDocument::builder()
        .paragraph("text")
        .disable(Capability::RangeCompare)
        .disable(Capability::ViewCursor)
        .build();
    assert!(doc.text().as_range_compare().is_none());
    assert!(doc.as_view_cursor().is_none());
    assert!(doc.as_storable().is_some());
}

#[test]
fn empty_document_has_no_enumeration() {
    let doc = MemoryDocument::builder().build();
    assert!(doc.text().paragraphs().is_none());
}

#[test]
fn ranges_from_other_documents_are_rejected() {
    let a = MemoryDocument::from_paragraphs(["a"]);
    let b = MemoryDocument::from_paragraphs(["b"]);
    let text = a.text();
    let compare = text.as_range_compare().unwrap();
    assert!(compare
        .compare_region_starts(&first_paragraph(&a), &first_paragraph(&b))
        .is_err());
}

#[test]
fn store_writes_json_export_and_close_is_final() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let url = format!("file://{}", path.display());

    let doc = MemoryDocument::from_paragraphs(["alpha beta"]);
    doc.as_storable()
        .unwrap()
        .store_to_url(&url, "colorlink_json_Export")
        .unwrap();

    let export: colorlink_engine::memory::DocumentExport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(export.filter, "colorlink_json_Export");
    match &export.blocks[0] {
        ExportBlock::Paragraph { words } => assert_eq!(words.len(), 2),
        other => panic!("expected paragraph, got {other:?}"),
    }

    let closer = doc.as_closeable().unwrap();
    closer.close(true).unwrap();
    assert!(doc.is_closed());
    assert!(closer.close(true).is_err());
    assert!(doc.as_storable().unwrap().store_to_url(&url, "x").is_err());
}
