//! colorlink document engine boundary
//!
//! The overlay linker and clipboard arbiter never own a document. They talk to
//! an external editing engine through the capabilities defined here:
//!
//! - **Text model**: paragraph enumeration, word cursors, span cursors, range
//!   comparison ([`text`])
//! - **Properties**: `CharColor`, `HyperLinkURL` and link styles on a range
//!   ([`properties`])
//! - **Document**: batch updates, view cursor, export and close ([`document`])
//! - **Clipboard**: the document-internal clipboard ([`clipboard`])
//!
//! Every optional capability is reached through an `as_*` query returning
//! `Option`, checked once at the use site.
//!
//! [`memory`] provides an in-memory engine implementing all of it, used by the
//! tests and the `colorlink` binary.
//!
//! # Example
//!
//! ```rust
//! use colorlink_engine::memory::MemoryDocument;
//! use colorlink_engine::{ParagraphElement, Text, TextDocument, TextRange};
//!
//! let doc = MemoryDocument::from_paragraphs(["The quick brown fox"]);
//! let text = doc.text();
//! let first = text.paragraphs().and_then(|mut p| p.next()).unwrap();
//! assert_eq!(first.as_text_range().unwrap().string(), "The quick brown fox");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod clipboard;
pub mod document;
pub mod error;
pub mod memory;
pub mod properties;
pub mod text;

// Re-exports
pub use batch::BatchUpdate;
pub use clipboard::{ClipboardItem, ClipboardPayload, DocumentClipboard, MimeType};
pub use document::{Closeable, RangeOf, Storable, TextDocument, ViewCursor};
pub use error::EngineError;
pub use properties::{PropertySet, PropertyValue};
pub use text::{
    ParagraphElement, RangeCompare, RegionOrder, Text, TextCursor, TextRange, TextTable,
    WordCursor,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for engine consumers
    pub use crate::{
        BatchUpdate, ClipboardItem, ClipboardPayload, DocumentClipboard, MimeType,
        ParagraphElement, PropertySet, PropertyValue, RangeCompare, RegionOrder, Text,
        TextCursor, TextDocument, TextRange, WordCursor,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
