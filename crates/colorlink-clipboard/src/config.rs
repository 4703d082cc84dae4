//! Clipboard arbitration configuration

use colorlink_engine::MimeType;
use serde::{Deserialize, Serialize};

/// Default private MIME type of the stamp item
pub const DEFAULT_METADATA_MIME_TYPE: &str = "application/x-colorlink-stamp";

/// Default capacity of the arbiter event queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Clipboard arbitration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Representations synced in both directions, in preference order
    pub desired_mime_types: Vec<MimeType>,
    /// Private type of the stamp item
    pub metadata_mime_type: MimeType,
    /// Events buffered before senders wait
    pub queue_capacity: usize,
}

impl ClipboardConfig {
    /// Create configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the synced representations
    #[must_use]
    pub fn with_desired_mime_types(mut self, mime_types: impl IntoIterator<Item = MimeType>) -> Self {
        self.desired_mime_types = mime_types.into_iter().collect();
        self
    }

    /// Set the stamp MIME type
    #[must_use]
    pub fn with_metadata_mime_type(mut self, mime_type: MimeType) -> Self {
        self.metadata_mime_type = mime_type;
        self
    }

    /// Set the event queue capacity
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            desired_mime_types: vec![MimeType::PlainText, MimeType::Html, MimeType::Png],
            metadata_mime_type: MimeType::parse(DEFAULT_METADATA_MIME_TYPE),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClipboardConfig::default();
        assert_eq!(config.desired_mime_types.len(), 3);
        assert_eq!(config.metadata_mime_type.as_str(), DEFAULT_METADATA_MIME_TYPE);
    }

    #[test]
    fn queue_capacity_is_at_least_one() {
        assert_eq!(ClipboardConfig::new().with_queue_capacity(0).queue_capacity, 1);
    }
}
