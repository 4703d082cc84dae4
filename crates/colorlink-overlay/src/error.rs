//! Error types for the overlay linker
//!
//! Two kinds of failure end a pass:
//! - running out of word colors inside one paragraph
//! - running out of paragraph colors for the document
//!
//! Everything else a pass meets (tables, unusable elements, spans that cannot
//! be materialized) is logged and counted in the
//! [`PassReport`](crate::PassReport) instead.

use colorlink_engine::EngineError;
use std::path::PathBuf;

/// Errors that abort an overlay or colorize pass
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// A paragraph has more words than the word section can number
    #[error("ran out of word colors after {words} words in paragraph {paragraph}: {word:?}")]
    WordColorSpaceExhausted {
        /// Element index of the paragraph in document order
        paragraph: usize,
        /// Words visited in that paragraph
        words: usize,
        /// Text of the word that exhausted the section
        word: String,
    },

    /// The document has more paragraphs than the paragraph section can number
    #[error("ran out of paragraph colors after {paragraphs} paragraphs")]
    ParagraphColorSpaceExhausted {
        /// Paragraphs walked, including the one that wrapped
        paragraphs: usize,
    },

    /// Document engine call failed
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Term data could not be loaded
    #[error("term data error: {0}")]
    Terms(#[from] TermError),
}

impl OverlayError {
    /// Whether the error aborted a pass midway, leaving partial side effects
    /// (colors or anchors) in the document
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::WordColorSpaceExhausted { .. }
                | Self::ParagraphColorSpaceExhausted { .. }
                | Self::Engine(_)
        )
    }

    /// Whether the error is one of the two color space exhaustion failures
    #[inline]
    #[must_use]
    pub fn is_color_space_exhausted(&self) -> bool {
        matches!(
            self,
            Self::WordColorSpaceExhausted { .. } | Self::ParagraphColorSpaceExhausted { .. }
        )
    }
}

/// Invalid color marker text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color marker {value:?}: expected 6 hex digits")]
pub struct ColorHexError {
    /// Rejected input
    pub value: String,
}

/// Errors loading term definitions
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// Term file could not be read
    #[error("failed to read term file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Term file is not valid JSON for the record format
    #[error("failed to parse term data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record carries an invalid color marker
    #[error("term {id} ({name}): {field}: {source}")]
    InvalidMarker {
        /// Record id
        id: u64,
        /// Record name
        name: String,
        /// Field holding the marker
        field: &'static str,
        /// Marker error
        #[source]
        source: ColorHexError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_is_fatal() {
        let word = OverlayError::WordColorSpaceExhausted {
            paragraph: 3,
            words: 511,
            word: "last".into(),
        };
        assert!(word.is_fatal());
        assert!(word.is_color_space_exhausted());
        assert!(word.to_string().contains("511 words in paragraph 3"));

        let paragraph = OverlayError::ParagraphColorSpaceExhausted { paragraphs: 32767 };
        assert!(paragraph.is_fatal());
    }

    #[test]
    fn term_errors_are_not_fatal() {
        let err: OverlayError = TermError::InvalidMarker {
            id: 4,
            name: "widget".into(),
            field: "termStartHex",
            source: ColorHexError {
                value: "xyz".into(),
            },
        }
        .into();
        assert!(!err.is_fatal());
        assert!(!err.is_color_space_exhausted());
        assert!(err.to_string().contains("termStartHex"));
    }
}
