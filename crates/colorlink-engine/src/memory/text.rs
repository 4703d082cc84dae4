//! Text handles of the in-memory engine

use super::model::{Block, Position, Shared};
use super::Capability;
use crate::error::EngineError;
use crate::properties::{self, PropertySet, PropertyValue};
use crate::text::{
    ParagraphElement, RangeCompare, RegionOrder, Text, TextCursor, TextRange, TextTable,
    WordCursor,
};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Range handle
#[derive(Clone)]
pub struct MemoryRange {
    pub(crate) doc: Shared,
    pub(crate) start: Position,
    pub(crate) end: Position,
}

impl MemoryRange {
    pub(crate) fn new(doc: Shared, start: Position, end: Position) -> Self {
        Self { doc, start, end }
    }

    /// Start position
    #[inline]
    #[must_use]
    pub fn start_position(&self) -> Position {
        self.start
    }

    /// End position
    #[inline]
    #[must_use]
    pub fn end_position(&self) -> Position {
        self.end
    }

    /// Whether both handles point into the same document
    #[inline]
    #[must_use]
    pub fn same_document(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc)
    }
}

impl PartialEq for MemoryRange {
    fn eq(&self, other: &Self) -> bool {
        self.same_document(other) && self.start == other.start && self.end == other.end
    }
}

impl fmt::Debug for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRange")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

impl TextRange for MemoryRange {
    fn start(&self) -> Self {
        Self::new(self.doc.clone(), self.start, self.start)
    }

    fn end(&self) -> Self {
        Self::new(self.doc.clone(), self.end, self.end)
    }

    fn string(&self) -> String {
        self.doc.borrow().text_between(self.start, self.end)
    }
}

fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn read_property(doc: &Shared, a: Position, b: Position, name: &str) -> Result<PropertyValue, EngineError> {
    properties::validate(name, &PropertyValue::Void)?;
    let (from, to) = ordered(a, b);
    Ok(doc.borrow().property(from, to, name))
}

fn write_property(
    doc: &Shared,
    a: Position,
    b: Position,
    name: &str,
    value: &PropertyValue,
) -> Result<(), EngineError> {
    properties::validate(name, value)?;
    let (from, to) = ordered(a, b);
    let mut state = doc.borrow_mut();
    if state.closed {
        return Err(EngineError::Closed);
    }
    state.set_property(from, to, name, value);
    Ok(())
}

/// Table element
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    rows: usize,
}

impl MemoryTable {
    /// Number of rows
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl TextTable for MemoryTable {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Element yielded by paragraph enumeration
#[derive(Debug)]
pub struct MemoryElement {
    table: Option<MemoryTable>,
    range: Option<MemoryRange>,
}

impl ParagraphElement for MemoryElement {
    type Range = MemoryRange;

    fn as_text_table(&self) -> Option<&dyn TextTable> {
        self.table.as_ref().map(|t| t as &dyn TextTable)
    }

    fn as_text_range(&self) -> Option<MemoryRange> {
        self.range.clone()
    }
}

/// Paragraph enumeration
#[derive(Debug)]
pub struct MemoryParagraphs {
    doc: Shared,
    next: usize,
}

impl Iterator for MemoryParagraphs {
    type Item = MemoryElement;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.doc.borrow();
        let block = self.next;
        let element = match state.blocks.get(block)? {
            Block::Paragraph(p) => MemoryElement {
                table: None,
                range: Some(MemoryRange::new(
                    self.doc.clone(),
                    Position::new(block, 0),
                    Position::new(block, p.len()),
                )),
            },
            Block::Table(t) => MemoryElement {
                table: Some(MemoryTable {
                    name: t.name.clone(),
                    rows: t.rows.len(),
                }),
                range: None,
            },
        };
        drop(state);
        self.next += 1;
        Some(element)
    }
}

/// Document body text
#[derive(Debug, Clone)]
pub struct MemoryText {
    pub(crate) doc: Shared,
}

impl Text for MemoryText {
    type Range = MemoryRange;
    type Element = MemoryElement;
    type Paragraphs = MemoryParagraphs;
    type WordCursor = MemoryWordCursor;
    type TextCursor = MemoryTextCursor;

    fn paragraphs(&self) -> Option<MemoryParagraphs> {
        let state = self.doc.borrow();
        if !state.is_enabled(Capability::ParagraphEnumeration) || state.blocks.is_empty() {
            return None;
        }
        Some(MemoryParagraphs {
            doc: self.doc.clone(),
            next: 0,
        })
    }

    fn create_word_cursor_by_range(&self, range: &MemoryRange) -> Option<MemoryWordCursor> {
        if !Rc::ptr_eq(&self.doc, &range.doc) {
            return None;
        }
        let state = self.doc.borrow();
        if !state.is_enabled(Capability::WordCursor) || state.paragraph(range.start.block).is_none()
        {
            return None;
        }
        Some(MemoryWordCursor {
            doc: self.doc.clone(),
            anchor: range.start,
            head: range.start,
        })
    }

    fn create_text_cursor(&self) -> MemoryTextCursor {
        let origin = Position::new(0, 0);
        MemoryTextCursor {
            doc: self.doc.clone(),
            anchor: origin,
            head: origin,
        }
    }

    fn as_range_compare(&self) -> Option<&dyn RangeCompare<MemoryRange>> {
        if self.doc.borrow().is_enabled(Capability::RangeCompare) {
            Some(self)
        } else {
            None
        }
    }
}

impl RangeCompare<MemoryRange> for MemoryText {
    fn compare_region_starts(
        &self,
        first: &MemoryRange,
        second: &MemoryRange,
    ) -> Result<RegionOrder, EngineError> {
        if !Rc::ptr_eq(&self.doc, &first.doc) || !Rc::ptr_eq(&self.doc, &second.doc) {
            return Err(EngineError::ForeignRange);
        }
        Ok(match first.start.cmp(&second.start) {
            Ordering::Less => RegionOrder::Before,
            Ordering::Equal => RegionOrder::Same,
            Ordering::Greater => RegionOrder::After,
        })
    }
}

/// Word cursor confined to the paragraph it was created in
#[derive(Debug)]
pub struct MemoryWordCursor {
    doc: Shared,
    anchor: Position,
    head: Position,
}

impl MemoryWordCursor {
    fn move_head(&mut self, offset: usize, expand: bool) {
        self.head.offset = offset;
        if !expand {
            self.anchor = self.head;
        }
    }

    fn selection(&self) -> (Position, Position) {
        ordered(self.anchor, self.head)
    }
}

impl WordCursor for MemoryWordCursor {
    type Range = MemoryRange;

    fn goto_start_of_word(&mut self, expand: bool) -> bool {
        let target = {
            let state = self.doc.borrow();
            state.paragraph(self.head.block).and_then(|p| {
                p.word_at(self.head.offset).map(|i| p.words[i].0)
            })
        };
        match target {
            Some(offset) => {
                self.move_head(offset, expand);
                true
            }
            None => {
                self.move_head(self.head.offset, expand);
                false
            }
        }
    }

    fn goto_end_of_word(&mut self, expand: bool) -> bool {
        let target = {
            let state = self.doc.borrow();
            state.paragraph(self.head.block).and_then(|p| {
                p.word_at(self.head.offset).map(|i| p.words[i].1)
            })
        };
        match target {
            Some(offset) => {
                self.move_head(offset, expand);
                true
            }
            None => {
                self.move_head(self.head.offset, expand);
                false
            }
        }
    }

    /// Moves to the next word, or to the paragraph end after the last word.
    /// Like the real engine it reports `true` for any movement, including the
    /// move past the last word. Without [`Capability::NextWordPastEnd`] it
    /// reports `true` on the last word without moving.
    fn goto_next_word(&mut self, expand: bool) -> bool {
        let (target, paragraph_end, stalls) = {
            let state = self.doc.borrow();
            let Some(p) = state.paragraph(self.head.block) else {
                return false;
            };
            (
                p.next_word(self.head.offset).map(|i| p.words[i].0),
                p.len(),
                !state.is_enabled(Capability::NextWordPastEnd),
            )
        };
        if target.is_none() && stalls {
            self.move_head(self.head.offset, expand);
            return true;
        }
        let offset = target.unwrap_or(paragraph_end);
        let moved = offset != self.head.offset;
        self.move_head(offset, expand);
        moved
    }

    fn start(&self) -> MemoryRange {
        let (from, _) = self.selection();
        MemoryRange::new(self.doc.clone(), from, from)
    }

    fn end(&self) -> MemoryRange {
        let (_, to) = self.selection();
        MemoryRange::new(self.doc.clone(), to, to)
    }

    fn string(&self) -> String {
        let (from, to) = self.selection();
        self.doc.borrow().text_between(from, to)
    }

    fn as_property_set(&self) -> Option<&dyn PropertySet> {
        if self.doc.borrow().is_enabled(Capability::WordProperties) {
            Some(self)
        } else {
            None
        }
    }
}

impl PropertySet for MemoryWordCursor {
    fn property_value(&self, name: &str) -> Result<PropertyValue, EngineError> {
        read_property(&self.doc, self.anchor, self.head, name)
    }

    fn set_property_value(&self, name: &str, value: PropertyValue) -> Result<(), EngineError> {
        write_property(&self.doc, self.anchor, self.head, name, &value)
    }
}

/// General span cursor
#[derive(Debug)]
pub struct MemoryTextCursor {
    doc: Shared,
    anchor: Position,
    head: Position,
}

impl TextCursor for MemoryTextCursor {
    type Range = MemoryRange;

    fn goto_range(&mut self, range: &MemoryRange, expand: bool) {
        if !Rc::ptr_eq(&self.doc, &range.doc) {
            tracing::warn!("ignoring goto_range with a range from another document");
            return;
        }
        if !expand {
            self.anchor = range.start;
        }
        self.head = range.end;
    }

    fn as_property_set(&self) -> Option<&dyn PropertySet> {
        if self.doc.borrow().is_enabled(Capability::SpanProperties) {
            Some(self)
        } else {
            None
        }
    }

    fn as_text_range(&self) -> Option<MemoryRange> {
        if !self.doc.borrow().is_enabled(Capability::SpanRange) {
            return None;
        }
        let (from, to) = ordered(self.anchor, self.head);
        Some(MemoryRange::new(self.doc.clone(), from, to))
    }
}

impl PropertySet for MemoryTextCursor {
    fn property_value(&self, name: &str) -> Result<PropertyValue, EngineError> {
        read_property(&self.doc, self.anchor, self.head, name)
    }

    fn set_property_value(&self, name: &str, value: PropertyValue) -> Result<(), EngineError> {
        write_property(&self.doc, self.anchor, self.head, name, &value)
    }
}
