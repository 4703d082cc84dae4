//! In-memory document engine
//!
//! A small but faithful stand-in for the external editing engine: paragraphs
//! and tables, Unicode word segmentation, per-character properties, a view
//! cursor, JSON export and a document clipboard. Capabilities can be switched
//! off per document to exercise the paths where the engine refuses a cast.
//!
//! Word cursors follow the engine's behavior closely enough to matter:
//! `goto_next_word` past the last word lands on the paragraph end, so callers
//! have to compare positions instead of trusting the return value.

mod clipboard;
mod document;
mod export;
mod model;
mod text;

pub use clipboard::MemoryClipboard;
pub use document::{HyperlinkRun, MemoryDocument, MemoryDocumentBuilder};
pub use export::{DocumentExport, ExportBlock, ExportWord};
pub use model::{BatchCounters, Position, StoredExport};
pub use text::{
    MemoryElement, MemoryParagraphs, MemoryRange, MemoryTable, MemoryText, MemoryTextCursor,
    MemoryWordCursor,
};

/// Capabilities that can be withheld by a [`MemoryDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Paragraph enumeration on the text
    ParagraphEnumeration,
    /// Word cursor creation
    WordCursor,
    /// Moving a word cursor off the last word of its paragraph. Withheld,
    /// `goto_next_word` on the last word stays put and still reports `true`,
    /// the way the real engine stalls in front of a table.
    NextWordPastEnd,
    /// Range comparison on the text
    RangeCompare,
    /// Property access on word cursors
    WordProperties,
    /// Property access on span cursors
    SpanProperties,
    /// Range handles from span cursors
    SpanRange,
    /// View cursor of the controller
    ViewCursor,
    /// Export
    Storable,
    /// Close
    Closeable,
}
