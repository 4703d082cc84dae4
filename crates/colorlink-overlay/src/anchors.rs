//! Anchors produced by the overlay linker and navigation to them

use crate::color::ColorHex;
use colorlink_engine::{RangeOf, TextDocument};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Persistent ranges keyed by definition start marker
///
/// Reference anchors are grouped under the start marker of the definition
/// they refer to.
#[derive(Debug, Clone)]
pub struct AnchorMap<R> {
    definitions: HashMap<ColorHex, R>,
    references: HashMap<ColorHex, Vec<R>>,
}

impl<R> Default for AnchorMap<R> {
    fn default() -> Self {
        Self {
            definitions: HashMap::new(),
            references: HashMap::new(),
        }
    }
}

impl<R> AnchorMap<R> {
    /// Empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the anchor of a definition, returning any anchor it replaces
    pub fn insert_definition(&mut self, term_start_hex: ColorHex, range: R) -> Option<R> {
        let previous = self.definitions.insert(term_start_hex, range);
        if previous.is_some() {
            warn!(%term_start_hex, "definition anchored twice, keeping the later anchor");
        }
        previous
    }

    /// Make sure a reference list exists for a definition
    pub fn ensure_references(&mut self, term_start_hex: ColorHex) {
        self.references.entry(term_start_hex).or_default();
    }

    /// Append a reference anchor to its definition's list
    pub fn push_reference(&mut self, term_start_hex: ColorHex, range: R) {
        self.references.entry(term_start_hex).or_default().push(range);
    }

    /// Anchor of a definition
    #[inline]
    #[must_use]
    pub fn definition(&self, term_start_hex: ColorHex) -> Option<&R> {
        self.definitions.get(&term_start_hex)
    }

    /// Reference anchors of a definition; `None` when no reference to it was
    /// ever opened
    #[inline]
    #[must_use]
    pub fn references(&self, term_start_hex: ColorHex) -> Option<&[R]> {
        self.references.get(&term_start_hex).map(Vec::as_slice)
    }

    /// Definition anchors sorted by start marker
    #[must_use]
    pub fn definitions(&self) -> Vec<(ColorHex, &R)> {
        let mut entries: Vec<_> = self.definitions.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// Number of definition anchors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definition was anchored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Total number of reference anchors
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.references.values().map(Vec::len).sum()
    }
}

/// Select a definition's anchor in the document view
///
/// Returns `false` when the marker has no anchor or the document offers no
/// view cursor.
pub fn goto_definition<D>(document: &D, anchors: &AnchorMap<RangeOf<D>>, term_start_hex: ColorHex) -> bool
where
    D: TextDocument + ?Sized,
{
    let Some(range) = anchors.definition(term_start_hex) else {
        debug!(%term_start_hex, "no anchor for definition");
        return false;
    };
    let Some(view) = document.as_view_cursor() else {
        warn!("document has no view cursor");
        return false;
    };
    view.goto_range(range, false);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(value: u32) -> ColorHex {
        ColorHex::new(value).unwrap()
    }

    #[test]
    fn definitions_are_replaced_and_sorted() {
        let mut map = AnchorMap::new();
        assert!(map.insert_definition(hex(0x400), "b").is_none());
        assert!(map.insert_definition(hex(0x200), "a").is_none());
        assert_eq!(map.insert_definition(hex(0x400), "c"), Some("b"));

        let entries = map.definitions();
        assert_eq!(entries, vec![(hex(0x200), &"a"), (hex(0x400), &"c")]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn reference_lists_start_empty() {
        let mut map: AnchorMap<&str> = AnchorMap::new();
        assert!(map.references(hex(0x200)).is_none());
        map.ensure_references(hex(0x200));
        assert_eq!(map.references(hex(0x200)), Some(&[][..]));
        map.push_reference(hex(0x200), "ref");
        map.ensure_references(hex(0x200));
        assert_eq!(map.references(hex(0x200)), Some(&["ref"][..]));
        assert_eq!(map.reference_count(), 1);
    }
}
