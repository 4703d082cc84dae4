//! Document-level capabilities

use crate::error::EngineError;
use crate::text::Text;

/// Range handle type of a document
pub type RangeOf<D> = <<D as TextDocument>::Text as Text>::Range;

/// A text document opened in the engine
pub trait TextDocument {
    /// Text model
    type Text: Text;

    /// Document body text
    fn text(&self) -> Self::Text;

    /// Suspend incremental relayout and repaint
    fn start_batch_update(&self);

    /// Resume incremental relayout and repaint
    fn finish_batch_update(&self);

    /// View cursor of the current controller
    fn as_view_cursor(&self) -> Option<&dyn ViewCursor<RangeOf<Self>>>;

    /// Export capability
    fn as_storable(&self) -> Option<&dyn Storable>;

    /// Close capability
    fn as_closeable(&self) -> Option<&dyn Closeable>;
}

/// Visible cursor of a document view
pub trait ViewCursor<R> {
    /// Select `range` in the view
    fn goto_range(&self, range: &R, expand: bool);
}

/// Export to a URL through a named filter
pub trait Storable {
    /// Store a copy of the document
    ///
    /// # Errors
    /// Engine-specific store failures.
    fn store_to_url(&self, url: &str, filter_name: &str) -> Result<(), EngineError>;
}

/// Close a document
pub trait Closeable {
    /// Close the document. With `deliver_ownership` the engine disposes it.
    ///
    /// # Errors
    /// [`EngineError::Closed`] when already closed.
    fn close(&self, deliver_ownership: bool) -> Result<(), EngineError>;
}
