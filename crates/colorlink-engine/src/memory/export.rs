//! JSON export format written by [`MemoryDocument`](super::MemoryDocument)

use serde::{Deserialize, Serialize};

/// Whole-document export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExport {
    /// Filter name the export was requested with
    pub filter: String,
    /// Blocks in document order
    pub blocks: Vec<ExportBlock>,
}

/// Exported block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExportBlock {
    /// Paragraph with its words
    Paragraph {
        /// Words with their character properties
        words: Vec<ExportWord>,
    },
    /// Table placeholder
    Table {
        /// Table name
        name: String,
        /// Row count
        rows: usize,
    },
}

/// Exported word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWord {
    /// Word text
    pub text: String,
    /// `CharColor` of the first character as 6 hex digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `HyperLinkURL` of the first character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}
