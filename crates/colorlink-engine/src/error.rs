//! Error types for the document engine boundary

/// Errors reported by a document engine capability
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The element does not expose the requested capability
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),

    /// Property name not known to the engine
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// Property value has the wrong type
    #[error("property {name} expects a {expected} value")]
    PropertyType {
        /// Property name
        name: String,
        /// Expected value kind
        expected: &'static str,
    },

    /// Range handle was created by a different document
    #[error("range belongs to a different document")]
    ForeignRange,

    /// Region comparison returned something other than -1, 0 or 1
    #[error("invalid region comparison result: {0}")]
    InvalidComparison(i16),

    /// Export failed
    #[error("store to {url} failed: {message}")]
    StoreFailed {
        /// Target URL
        url: String,
        /// Underlying failure
        message: String,
    },

    /// Document was already closed
    #[error("document is closed")]
    Closed,

    /// Clipboard could not be read
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

impl EngineError {
    /// Create a store failure for a URL
    pub fn store_failed(url: impl Into<String>, message: impl ToString) -> Self {
        Self::StoreFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }
}
