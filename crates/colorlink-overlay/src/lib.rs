//! colorlink overlay linker
//!
//! Turns externally computed term definitions into hyperlink anchors inside a
//! document that can only be reached through a word cursor.
//!
//! # How it works
//!
//! 1. [`Colorizer`] walks the document and gives every word a unique 24-bit
//!    `CharColor` ([`color`] describes the layout). The colorized export is
//!    analysed elsewhere and comes back as a term file whose definitions and
//!    references are located by the colors of their first and last words.
//! 2. [`TermTable::build`] indexes those definitions by color.
//! 3. [`Annotator`] walks the original document again. The walk reproduces the
//!    same color sequence without reading any color back, and the
//!    [`OverlayLinker`] state machine converts matched color spans into
//!    `term://` and `termref://` anchors.
//! 4. [`goto_definition`] selects an anchor in the document view.
//!
//! # Example
//!
//! ```rust
//! use colorlink_engine::memory::MemoryDocument;
//! use colorlink_overlay::{Annotator, ColorHex, Definition, TermTable};
//!
//! let doc = MemoryDocument::from_paragraphs(["The quick brown fox jumps"]);
//! let table = TermTable::build([Definition::new(
//!     1,
//!     "quick brown",
//!     ColorHex::for_word(0, 1).unwrap(),
//!     ColorHex::for_word(0, 2).unwrap(),
//! )]);
//!
//! let annotation = Annotator::default().annotate(&doc, &table).unwrap();
//! assert_eq!(annotation.report.definitions_matched, 1);
//! assert_eq!(doc.hyperlinks()[0].text, "quick brown");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod anchors;
pub mod color;
pub mod colorize;
pub mod config;
pub mod encoder;
pub mod error;
pub mod linker;
pub mod terms;

// Re-exports
pub use anchors::{goto_definition, AnchorMap};
pub use color::{ColorCounter, ColorHex};
pub use colorize::{ColorWriter, ColorizeJob, Colorizer};
pub use config::OverlayConfig;
pub use encoder::{ColorCursorEncoder, PassReport, Word, WordVisitor};
pub use error::{ColorHexError, OverlayError, TermError};
pub use linker::{Annotation, Annotator, OverlayLinker, PassAborted};
pub use terms::{Definition, ReferenceMarker, ResolvedReference, TermFile, TermRecord, TermTable};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for overlay users
    pub use crate::{
        goto_definition, AnchorMap, Annotation, Annotator, ColorHex, ColorizeJob, Colorizer,
        Definition, OverlayConfig, OverlayError, PassAborted, PassReport, TermFile, TermTable,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
