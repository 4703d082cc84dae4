//! Shared document state behind the in-memory engine handles

use super::Capability;
use crate::properties::PropertyValue;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub(crate) type Shared = Rc<RefCell<DocState>>;

type CharAttributes = BTreeMap<String, PropertyValue>;

/// Position inside the document: block index and character offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Index of the paragraph or table in document order
    pub block: usize,
    /// Character offset inside the paragraph
    pub offset: usize,
}

impl Position {
    /// Create a position
    #[inline]
    #[must_use]
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

#[derive(Debug)]
pub(crate) struct ParagraphData {
    pub(crate) chars: Vec<char>,
    pub(crate) attributes: Vec<CharAttributes>,
    /// Word spans as half-open character ranges
    pub(crate) words: Vec<(usize, usize)>,
}

impl ParagraphData {
    pub(crate) fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let attributes = vec![CharAttributes::new(); chars.len()];
        Self {
            words: segment_words(text),
            chars,
            attributes,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.len());
        let from = from.min(to);
        self.chars[from..to].iter().collect()
    }

    /// Index of the word containing `offset`, or ending exactly at it
    pub(crate) fn word_at(&self, offset: usize) -> Option<usize> {
        self.words
            .iter()
            .position(|&(s, e)| s <= offset && offset < e)
            .or_else(|| self.words.iter().position(|&(_, e)| e == offset))
    }

    /// Index of the word following the one at `offset`
    pub(crate) fn next_word(&self, offset: usize) -> Option<usize> {
        let next = match self.word_at(offset) {
            Some(current) => current + 1,
            None => self.words.partition_point(|&(s, _)| s <= offset),
        };
        (next < self.words.len()).then_some(next)
    }
}

#[derive(Debug)]
pub(crate) struct TableData {
    pub(crate) name: String,
    pub(crate) rows: Vec<Vec<String>>,
}

#[derive(Debug)]
pub(crate) enum Block {
    Paragraph(ParagraphData),
    Table(TableData),
}

/// Batch update bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounters {
    /// Currently open batches
    pub depth: usize,
    /// Batches started over the document lifetime
    pub started: usize,
    /// Batches finished over the document lifetime
    pub finished: usize,
}

/// Record of a `store_to_url` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredExport {
    /// Target URL
    pub url: String,
    /// Export filter name
    pub filter_name: String,
}

#[derive(Debug, Default)]
pub(crate) struct DocState {
    pub(crate) blocks: Vec<Block>,
    pub(crate) batch: BatchCounters,
    pub(crate) view_selection: Option<(Position, Position)>,
    pub(crate) stored: Vec<StoredExport>,
    pub(crate) closed: bool,
    pub(crate) disabled: HashSet<Capability>,
}

impl DocState {
    pub(crate) fn is_enabled(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }

    pub(crate) fn paragraph(&self, block: usize) -> Option<&ParagraphData> {
        match self.blocks.get(block) {
            Some(Block::Paragraph(p)) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn paragraph_len(&self, block: usize) -> usize {
        self.paragraph(block).map_or(0, ParagraphData::len)
    }

    /// Text between two positions; paragraphs are joined by `\n`, tables are skipped
    pub(crate) fn text_between(&self, from: Position, to: Position) -> String {
        if from >= to {
            return String::new();
        }

        let mut parts = Vec::new();
        for block in from.block..=to.block {
            let Some(paragraph) = self.paragraph(block) else {
                continue;
            };
            let start = if block == from.block { from.offset } else { 0 };
            let end = if block == to.block {
                to.offset
            } else {
                paragraph.len()
            };
            parts.push(paragraph.slice(start, end));
        }
        parts.join("\n")
    }

    fn char_span(&self, block: usize, from: Position, to: Position) -> (usize, usize) {
        let len = self.paragraph_len(block);
        let start = if block == from.block { from.offset.min(len) } else { 0 };
        let end = if block == to.block { to.offset.min(len) } else { len };
        (start, end.max(start))
    }

    pub(crate) fn set_property(
        &mut self,
        from: Position,
        to: Position,
        name: &str,
        value: &PropertyValue,
    ) {
        if from >= to {
            return;
        }
        for block in from.block..=to.block {
            let (start, end) = self.char_span(block, from, to);
            if let Some(Block::Paragraph(paragraph)) = self.blocks.get_mut(block) {
                for attrs in &mut paragraph.attributes[start..end] {
                    if value.is_void() {
                        attrs.remove(name);
                    } else {
                        attrs.insert(name.to_string(), value.clone());
                    }
                }
            }
        }
    }

    /// Uniform value over the range; mixed or empty ranges read as void
    pub(crate) fn property(&self, from: Position, to: Position, name: &str) -> PropertyValue {
        let mut found: Option<&PropertyValue> = None;
        let void = PropertyValue::Void;
        for block in from.block..=to.block.max(from.block) {
            let Some(paragraph) = self.paragraph(block) else {
                continue;
            };
            let (start, end) = self.char_span(block, from, to);
            for attrs in &paragraph.attributes[start..end] {
                let value = attrs.get(name).unwrap_or(&void);
                match found {
                    None => found = Some(value),
                    Some(prev) if prev != value => return PropertyValue::Void,
                    Some(_) => {}
                }
            }
        }
        found.cloned().unwrap_or(PropertyValue::Void)
    }

    pub(crate) fn char_property(&self, position: Position, name: &str) -> Option<&PropertyValue> {
        self.paragraph(position.block)
            .and_then(|p| p.attributes.get(position.offset))
            .and_then(|attrs| attrs.get(name))
    }
}

/// Split text into word spans (character offsets). A word is any Unicode word
/// segment containing at least one alphanumeric character.
pub(crate) fn segment_words(text: &str) -> Vec<(usize, usize)> {
    let mut words = Vec::new();
    let mut offset = 0;
    for segment in text.split_word_bounds() {
        let len = segment.chars().count();
        if segment.chars().any(char::is_alphanumeric) {
            words.push((offset, offset + len));
        }
        offset += len;
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn segments_skip_spaces_and_punctuation() {
        assert_eq!(
            segment_words("The quick, brown fox!"),
            vec![(0, 3), (4, 9), (11, 16), (17, 20)]
        );
    }

    #[test]
    fn word_at_prefers_containing_word() {
        let p = ParagraphData::new("ab cd");
        assert_eq!(p.word_at(0), Some(0));
        assert_eq!(p.word_at(2), Some(0));
        assert_eq!(p.word_at(3), Some(1));
        assert_eq!(p.next_word(2), Some(1));
        assert_eq!(p.next_word(4), None);
    }

    #[test]
    fn mixed_property_reads_void() {
        let mut state = DocState::default();
        state.blocks.push(Block::Paragraph(ParagraphData::new("abcd")));
        let a = Position::new(0, 0);
        let mid = Position::new(0, 2);
        let end = Position::new(0, 4);

        state.set_property(a, mid, "CharColor", &PropertyValue::color(1));
        assert_eq!(state.property(a, mid, "CharColor"), PropertyValue::color(1));
        assert_eq!(state.property(a, end, "CharColor"), PropertyValue::Void);
    }

    proptest! {
        #[test]
        fn segments_are_ordered_words(text in "[a-z0-9 ,.!é]{0,40}") {
            let chars: Vec<char> = text.chars().collect();
            let words = segment_words(&text);
            let mut previous_end = 0;
            for &(start, end) in &words {
                prop_assert!(start >= previous_end);
                prop_assert!(start < end && end <= chars.len());
                prop_assert!(chars[start..end].iter().any(|c| c.is_alphanumeric()));
                previous_end = end;
            }
            // every alphanumeric character belongs to some word
            for (i, c) in chars.iter().enumerate() {
                if c.is_alphanumeric() {
                    prop_assert!(words.iter().any(|&(s, e)| s <= i && i < e));
                }
            }
        }
    }
}
