//! Text model capabilities
//!
//! Mirrors the word-granular cursor API of the editing engine. Ranges are
//! opaque handles owned by the engine; the only things a consumer can do with
//! them are collapse them to their start or end, read their text, compare their
//! starts and hand them back to a cursor.

use crate::error::EngineError;
use crate::properties::PropertySet;
use std::fmt;

/// Opaque text range handle
pub trait TextRange: Clone + fmt::Debug {
    /// Collapsed range at the start of this range
    #[must_use]
    fn start(&self) -> Self;

    /// Collapsed range at the end of this range
    #[must_use]
    fn end(&self) -> Self;

    /// Text covered by the range
    fn string(&self) -> String;
}

/// Position of the first region start relative to the second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionOrder {
    /// First starts strictly before second
    Before,
    /// Both start at the same position
    Same,
    /// First starts strictly after second
    After,
}

impl RegionOrder {
    /// Convert the engine's `compareRegionStarts` result.
    ///
    /// The engine returns `1` when the first region starts before the second,
    /// `0` when equal and `-1` when it starts after.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidComparison`] for any other value.
    pub fn from_engine(value: i16) -> Result<Self, EngineError> {
        match value {
            1 => Ok(Self::Before),
            0 => Ok(Self::Same),
            -1 => Ok(Self::After),
            other => Err(EngineError::InvalidComparison(other)),
        }
    }

    /// Engine encoding of this ordering
    #[inline]
    #[must_use]
    pub fn to_engine(self) -> i16 {
        match self {
            Self::Before => 1,
            Self::Same => 0,
            Self::After => -1,
        }
    }
}

/// Range comparison capability
pub trait RangeCompare<R> {
    /// Compare where two regions start
    ///
    /// # Errors
    /// Fails when either range does not belong to this text.
    fn compare_region_starts(&self, first: &R, second: &R) -> Result<RegionOrder, EngineError>;
}

/// Word-granular cursor
///
/// The `expand` flag keeps the selection anchor in place and only moves the
/// cursor head, exactly like the engine API.
pub trait WordCursor {
    /// Range handle type
    type Range: TextRange;

    /// Move to the start of the current word
    fn goto_start_of_word(&mut self, expand: bool) -> bool;

    /// Move to the end of the current word
    fn goto_end_of_word(&mut self, expand: bool) -> bool;

    /// Move to the start of the next word.
    ///
    /// The return value is not reliable: engines report `true` while stalled
    /// on the same word, notably in front of embedded tables.
    fn goto_next_word(&mut self, expand: bool) -> bool;

    /// Collapsed range at the selection start
    fn start(&self) -> Self::Range;

    /// Collapsed range at the selection end
    fn end(&self) -> Self::Range;

    /// Selected text
    fn string(&self) -> String;

    /// Property access on the current selection
    fn as_property_set(&self) -> Option<&dyn PropertySet>;
}

/// General text cursor used to materialize spans
pub trait TextCursor {
    /// Range handle type
    type Range: TextRange;

    /// Move to a range; with `expand` only the head moves to the range end
    fn goto_range(&mut self, range: &Self::Range, expand: bool);

    /// Property access on the current selection
    fn as_property_set(&self) -> Option<&dyn PropertySet>;

    /// Persistent range handle for the current selection
    fn as_text_range(&self) -> Option<Self::Range>;
}

/// Embedded table
pub trait TextTable {
    /// Table name
    fn name(&self) -> String;
}

/// Element produced by paragraph enumeration
pub trait ParagraphElement {
    /// Range handle type
    type Range: TextRange;

    /// Table capability
    fn as_text_table(&self) -> Option<&dyn TextTable>;

    /// Range capability
    fn as_text_range(&self) -> Option<Self::Range>;
}

/// Document text
pub trait Text {
    /// Range handle type
    type Range: TextRange;
    /// Enumerated element type
    type Element: ParagraphElement<Range = Self::Range>;
    /// Paragraph enumeration
    type Paragraphs: Iterator<Item = Self::Element>;
    /// Word cursor type
    type WordCursor: WordCursor<Range = Self::Range>;
    /// Span cursor type
    type TextCursor: TextCursor<Range = Self::Range>;

    /// Enumerate paragraph-like elements in document order.
    ///
    /// `None` when the text exposes no enumeration or has no elements.
    fn paragraphs(&self) -> Option<Self::Paragraphs>;

    /// Word cursor positioned at the start of `range`
    fn create_word_cursor_by_range(&self, range: &Self::Range) -> Option<Self::WordCursor>;

    /// Fresh span cursor
    fn create_text_cursor(&self) -> Self::TextCursor;

    /// Range comparison capability
    fn as_range_compare(&self) -> Option<&dyn RangeCompare<Self::Range>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_order_engine_encoding() {
        for order in [RegionOrder::Before, RegionOrder::Same, RegionOrder::After] {
            assert_eq!(RegionOrder::from_engine(order.to_engine()).unwrap(), order);
        }
        assert!(matches!(
            RegionOrder::from_engine(2),
            Err(EngineError::InvalidComparison(2))
        ));
    }
}
