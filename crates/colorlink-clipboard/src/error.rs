//! Error types for clipboard arbitration
//!
//! Arbitration itself never fails towards the caller: a failed read or write
//! degrades to a no-op outcome. These errors describe what went wrong for
//! logging and for the outcome values.

use colorlink_engine::{EngineError, MimeType};

/// Errors reported by a host clipboard
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostClipboardError {
    /// Clipboard could not be opened
    #[error("host clipboard unavailable: {0}")]
    Unavailable(String),

    /// Host refused the content
    #[error("host clipboard rejected write: {0}")]
    Rejected(String),
}

impl HostClipboardError {
    /// Whether retrying later may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Clipboard arbitration errors
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// Host clipboard failure
    #[error("host clipboard: {0}")]
    Host(#[from] HostClipboardError),

    /// Document clipboard failure
    #[error("document clipboard: {0}")]
    Document(#[from] EngineError),

    /// Document clipboard refused the imported items
    #[error("document clipboard refused {0} imported items")]
    ImportRejected(usize),

    /// Document refused to paste a representation
    #[error("document refused to paste {0}")]
    PasteRejected(MimeType),

    /// Arbiter task is no longer running
    #[error("clipboard arbiter has shut down")]
    Closed,
}

impl ClipboardError {
    /// Whether retrying later may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Host(e) => e.is_retryable(),
            Self::Document(EngineError::ClipboardUnavailable(_)) => true,
            Self::Document(_) | Self::ImportRejected(_) | Self::PasteRejected(_) | Self::Closed => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(ClipboardError::from(HostClipboardError::Unavailable("busy".into())).is_retryable());
        assert!(!ClipboardError::from(HostClipboardError::Rejected("too big".into())).is_retryable());
        assert!(ClipboardError::from(EngineError::ClipboardUnavailable("locked".into())).is_retryable());
        assert!(!ClipboardError::Closed.is_retryable());
        assert!(!ClipboardError::PasteRejected(MimeType::Html).is_retryable());
    }
}
