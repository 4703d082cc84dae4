//! In-memory text document

use super::export::{DocumentExport, ExportBlock, ExportWord};
use super::model::{
    BatchCounters, Block, DocState, ParagraphData, Position, Shared, StoredExport, TableData,
};
use super::text::{MemoryRange, MemoryText};
use super::Capability;
use crate::document::{Closeable, Storable, TextDocument, ViewCursor};
use crate::error::EngineError;
use crate::properties::{CHAR_COLOR, HYPERLINK_URL, UNVISITED_CHAR_STYLE_NAME, VISITED_CHAR_STYLE_NAME};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Contiguous run of characters sharing one `HyperLinkURL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkRun {
    /// Linked text
    pub text: String,
    /// Link target
    pub url: String,
    /// Visited style name, if set
    pub visited_style: Option<String>,
    /// Unvisited style name, if set
    pub unvisited_style: Option<String>,
}

/// Builder for [`MemoryDocument`]
#[derive(Debug, Default)]
pub struct MemoryDocumentBuilder {
    blocks: Vec<Block>,
    disabled: HashSet<Capability>,
}

impl MemoryDocumentBuilder {
    /// Append a paragraph
    #[must_use]
    pub fn paragraph(mut self, text: impl AsRef<str>) -> Self {
        self.blocks
            .push(Block::Paragraph(ParagraphData::new(text.as_ref())));
        self
    }

    /// Append a table
    #[must_use]
    pub fn table(mut self, name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        self.blocks.push(Block::Table(TableData {
            name: name.into(),
            rows,
        }));
        self
    }

    /// Hide a capability from consumers
    #[must_use]
    pub fn disable(mut self, capability: Capability) -> Self {
        self.disabled.insert(capability);
        self
    }

    /// Build the document
    #[must_use]
    pub fn build(self) -> MemoryDocument {
        let state = DocState {
            blocks: self.blocks,
            disabled: self.disabled,
            ..DocState::default()
        };
        MemoryDocument {
            state: Rc::new(RefCell::new(state)),
        }
    }
}

/// Text document held entirely in memory
///
/// Handles (ranges, cursors, text) share the document state, so anchors stay
/// valid for as long as the document lives.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: Shared,
}

impl MemoryDocument {
    /// Start building a document
    #[must_use]
    pub fn builder() -> MemoryDocumentBuilder {
        MemoryDocumentBuilder::default()
    }

    /// Document made of plain paragraphs
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paragraphs
            .into_iter()
            .fold(Self::builder(), |builder, text| builder.paragraph(text))
            .build()
    }

    /// Parse a line-oriented markup: every line is a paragraph, consecutive
    /// lines starting with `|` form one table with `|`-separated cells.
    #[must_use]
    pub fn from_markup(source: &str) -> Self {
        let mut builder = Self::builder();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut tables = 0usize;

        for line in source.lines() {
            if let Some(row) = line.trim_start().strip_prefix('|') {
                rows.push(
                    row.trim_end_matches('|')
                        .split('|')
                        .map(|cell| cell.trim().to_string())
                        .collect(),
                );
                continue;
            }
            if !rows.is_empty() {
                tables += 1;
                builder = builder.table(format!("Table{tables}"), std::mem::take(&mut rows));
            }
            builder = builder.paragraph(line);
        }
        if !rows.is_empty() {
            tables += 1;
            builder = builder.table(format!("Table{tables}"), rows);
        }
        builder.build()
    }

    /// Batch update bookkeeping
    #[must_use]
    pub fn batch_counters(&self) -> BatchCounters {
        self.state.borrow().batch
    }

    /// Whether the document was closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Exports requested so far
    #[must_use]
    pub fn stored_exports(&self) -> Vec<StoredExport> {
        self.state.borrow().stored.clone()
    }

    /// Number of blocks (paragraphs and tables)
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.state.borrow().blocks.len()
    }

    /// Text currently selected by the view cursor
    #[must_use]
    pub fn view_selection_text(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .view_selection
            .map(|(from, to)| state.text_between(from, to))
    }

    /// Words of a paragraph block
    #[must_use]
    pub fn words(&self, block: usize) -> Vec<String> {
        let state = self.state.borrow();
        state
            .paragraph(block)
            .map(|p| p.words.iter().map(|&(s, e)| p.slice(s, e)).collect())
            .unwrap_or_default()
    }

    /// `CharColor` of each word's first character in a paragraph block
    #[must_use]
    pub fn word_colors(&self, block: usize) -> Vec<Option<u32>> {
        let state = self.state.borrow();
        let Some(p) = state.paragraph(block) else {
            return Vec::new();
        };
        p.words
            .iter()
            .map(|&(s, _)| {
                state
                    .char_property(Position::new(block, s), CHAR_COLOR)
                    .and_then(crate::PropertyValue::as_long)
                    .and_then(|v| u32::try_from(v).ok())
            })
            .collect()
    }

    /// Hyperlink runs, paragraph by paragraph
    #[must_use]
    pub fn hyperlinks(&self) -> Vec<HyperlinkRun> {
        let state = self.state.borrow();
        let mut runs = Vec::new();

        for (block, item) in state.blocks.iter().enumerate() {
            let Block::Paragraph(p) = item else {
                continue;
            };
            let mut offset = 0;
            while offset < p.len() {
                let url_at = |o: usize| {
                    state
                        .char_property(Position::new(block, o), HYPERLINK_URL)
                        .and_then(|v| v.as_str().map(str::to_string))
                };
                let Some(url) = url_at(offset) else {
                    offset += 1;
                    continue;
                };
                let start = offset;
                while offset < p.len() && url_at(offset).as_deref() == Some(url.as_str()) {
                    offset += 1;
                }
                let style = |name: &str| {
                    state
                        .char_property(Position::new(block, start), name)
                        .and_then(|v| v.as_str().map(str::to_string))
                };
                runs.push(HyperlinkRun {
                    text: p.slice(start, offset),
                    url,
                    visited_style: style(VISITED_CHAR_STYLE_NAME),
                    unvisited_style: style(UNVISITED_CHAR_STYLE_NAME),
                });
            }
        }
        runs
    }

    /// Snapshot of the document in the JSON export format
    #[must_use]
    pub fn export(&self, filter_name: &str) -> DocumentExport {
        let state = self.state.borrow();
        let blocks = state
            .blocks
            .iter()
            .enumerate()
            .map(|(block, item)| match item {
                Block::Paragraph(p) => ExportBlock::Paragraph {
                    words: p
                        .words
                        .iter()
                        .map(|&(s, e)| {
                            let at = Position::new(block, s);
                            ExportWord {
                                text: p.slice(s, e),
                                color: state
                                    .char_property(at, CHAR_COLOR)
                                    .and_then(crate::PropertyValue::as_long)
                                    .map(|c| format!("{c:06x}")),
                                hyperlink: state
                                    .char_property(at, HYPERLINK_URL)
                                    .and_then(|v| v.as_str().map(str::to_string)),
                            }
                        })
                        .collect(),
                },
                Block::Table(t) => ExportBlock::Table {
                    name: t.name.clone(),
                    rows: t.rows.len(),
                },
            })
            .collect();

        DocumentExport {
            filter: filter_name.to_string(),
            blocks,
        }
    }

    fn enabled(&self, capability: Capability) -> bool {
        self.state.borrow().is_enabled(capability)
    }
}

impl TextDocument for MemoryDocument {
    type Text = MemoryText;

    fn text(&self) -> MemoryText {
        MemoryText {
            doc: self.state.clone(),
        }
    }

    fn start_batch_update(&self) {
        let mut state = self.state.borrow_mut();
        state.batch.depth += 1;
        state.batch.started += 1;
    }

    fn finish_batch_update(&self) {
        let mut state = self.state.borrow_mut();
        state.batch.depth = state.batch.depth.saturating_sub(1);
        state.batch.finished += 1;
    }

    fn as_view_cursor(&self) -> Option<&dyn ViewCursor<MemoryRange>> {
        if self.enabled(Capability::ViewCursor) {
            Some(self)
        } else {
            None
        }
    }

    fn as_storable(&self) -> Option<&dyn Storable> {
        if self.enabled(Capability::Storable) {
            Some(self)
        } else {
            None
        }
    }

    fn as_closeable(&self) -> Option<&dyn Closeable> {
        if self.enabled(Capability::Closeable) {
            Some(self)
        } else {
            None
        }
    }
}

impl ViewCursor<MemoryRange> for MemoryDocument {
    fn goto_range(&self, range: &MemoryRange, expand: bool) {
        if !Rc::ptr_eq(&self.state, &range.doc) {
            tracing::warn!("view cursor asked to select a range from another document");
            return;
        }
        let mut state = self.state.borrow_mut();
        let anchor = match (expand, state.view_selection) {
            (true, Some((anchor, _))) => anchor,
            _ => range.start,
        };
        state.view_selection = Some((anchor, range.end));
    }
}

impl Storable for MemoryDocument {
    fn store_to_url(&self, url: &str, filter_name: &str) -> Result<(), EngineError> {
        if self.is_closed() {
            return Err(EngineError::Closed);
        }

        if let Some(path) = url.strip_prefix("file://") {
            let export = self.export(filter_name);
            let json = serde_json::to_string_pretty(&export)
                .map_err(|e| EngineError::store_failed(url, e))?;
            std::fs::write(path, json).map_err(|e| EngineError::store_failed(url, e))?;
        }

        tracing::debug!(url, filter_name, "document stored");
        self.state.borrow_mut().stored.push(StoredExport {
            url: url.to_string(),
            filter_name: filter_name.to_string(),
        });
        Ok(())
    }
}

impl Closeable for MemoryDocument {
    fn close(&self, _deliver_ownership: bool) -> Result<(), EngineError> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(EngineError::Closed);
        }
        state.closed = true;
        Ok(())
    }
}
