//! Clipboard item model and the document-internal clipboard

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clipboard MIME type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MimeType {
    /// `text/plain`
    PlainText,
    /// `text/html`
    Html,
    /// `image/png`
    Png,
    /// Any other type, including private metadata types
    Other(String),
}

impl MimeType {
    /// Bare MIME type, as used when writing a clipboard
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PlainText => "text/plain",
            Self::Html => "text/html",
            Self::Png => "image/png",
            Self::Other(s) => s,
        }
    }

    /// MIME type as used when reading a clipboard; text types carry a charset
    #[must_use]
    pub fn query_str(&self) -> String {
        if self.is_text() {
            format!("{};charset=utf-8", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }

    /// Whether the payload is text
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::PlainText | Self::Html)
    }

    /// Parse a MIME string, dropping parameters such as `;charset=utf-8`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "text/plain" => Self::PlainText,
            "text/html" => Self::Html,
            "image/png" => Self::Png,
            _ => Self::Other(essence),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for MimeType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<MimeType> for String {
    fn from(value: MimeType) -> Self {
        value.as_str().to_string()
    }
}

/// Clipboard payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardPayload {
    /// Text payload
    Text(String),
    /// Binary payload
    Binary(Vec<u8>),
}

impl ClipboardPayload {
    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            Self::Binary(b) => b.len(),
        }
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One representation on a clipboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardItem {
    /// MIME type
    pub mime_type: MimeType,
    /// Payload
    pub payload: ClipboardPayload,
}

impl ClipboardItem {
    /// Text item
    pub fn text(mime_type: MimeType, text: impl Into<String>) -> Self {
        Self {
            mime_type,
            payload: ClipboardPayload::Text(text.into()),
        }
    }

    /// Binary item
    pub fn binary(mime_type: MimeType, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type,
            payload: ClipboardPayload::Binary(bytes.into()),
        }
    }

    /// Text payload, if any
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            ClipboardPayload::Text(s) => Some(s),
            ClipboardPayload::Binary(_) => None,
        }
    }
}

/// Clipboard of the document engine's current view
pub trait DocumentClipboard: Send + Sync {
    /// Read the clipboard for the requested MIME strings, in request order.
    /// Types that are not present are left out.
    ///
    /// # Errors
    /// [`EngineError::ClipboardUnavailable`] when the clipboard cannot be read.
    fn get_clipboard(&self, mime_types: &[String]) -> Result<Vec<ClipboardItem>, EngineError>;

    /// Replace the clipboard with `items`
    fn set_clipboard(&self, items: &[ClipboardItem]) -> bool;

    /// Paste `data` of `mime_type` at the current selection
    fn paste(&self, mime_type: &MimeType, data: &ClipboardPayload) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_parameters() {
        assert_eq!(MimeType::parse("text/plain;charset=utf-8"), MimeType::PlainText);
        assert_eq!(MimeType::parse("Text/HTML"), MimeType::Html);
        assert_eq!(
            MimeType::parse("application/x-colorlink-stamp"),
            MimeType::Other("application/x-colorlink-stamp".to_string())
        );
    }

    #[test]
    fn query_adds_charset_for_text_only() {
        assert_eq!(MimeType::PlainText.query_str(), "text/plain;charset=utf-8");
        assert_eq!(MimeType::Html.query_str(), "text/html;charset=utf-8");
        assert_eq!(MimeType::Png.query_str(), "image/png");
    }

    #[test]
    fn serde_uses_plain_strings() {
        let json = serde_json::to_string(&MimeType::Png).unwrap();
        assert_eq!(json, "\"image/png\"");
        let back: MimeType = serde_json::from_str("\"text/html\"").unwrap();
        assert_eq!(back, MimeType::Html);
    }
}
