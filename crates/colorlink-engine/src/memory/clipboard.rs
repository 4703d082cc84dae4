//! In-memory document clipboard

use crate::clipboard::{ClipboardItem, ClipboardPayload, DocumentClipboard, MimeType};
use crate::error::EngineError;
use parking_lot::Mutex;

/// Document clipboard holding one item per MIME type
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    items: Mutex<Vec<ClipboardItem>>,
    pasted: Mutex<Vec<ClipboardItem>>,
    unreadable: Mutex<bool>,
    refuse_paste: Mutex<bool>,
}

impl MemoryClipboard {
    /// Empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a local copy in the document
    pub fn copy(&self, items: impl IntoIterator<Item = ClipboardItem>) {
        let mut stored = self.items.lock();
        stored.clear();
        for item in items {
            if !stored.iter().any(|i| i.mime_type == item.mime_type) {
                stored.push(item);
            }
        }
    }

    /// Current clipboard content
    #[must_use]
    pub fn items(&self) -> Vec<ClipboardItem> {
        self.items.lock().clone()
    }

    /// Payloads pasted through [`DocumentClipboard::paste`]
    #[must_use]
    pub fn pasted(&self) -> Vec<ClipboardItem> {
        self.pasted.lock().clone()
    }

    /// Make reads fail, for exercising degraded paths
    pub fn set_unreadable(&self, unreadable: bool) {
        *self.unreadable.lock() = unreadable;
    }

    /// Make [`DocumentClipboard::paste`] report failure
    pub fn set_refuse_paste(&self, refuse: bool) {
        *self.refuse_paste.lock() = refuse;
    }
}

impl DocumentClipboard for MemoryClipboard {
    fn get_clipboard(&self, mime_types: &[String]) -> Result<Vec<ClipboardItem>, EngineError> {
        if *self.unreadable.lock() {
            return Err(EngineError::ClipboardUnavailable(
                "clipboard locked by another view".to_string(),
            ));
        }
        let items = self.items.lock();
        Ok(mime_types
            .iter()
            .map(|query| MimeType::parse(query))
            .filter_map(|mime| items.iter().find(|i| i.mime_type == mime).cloned())
            .collect())
    }

    fn set_clipboard(&self, items: &[ClipboardItem]) -> bool {
        if items.is_empty() {
            return false;
        }
        self.copy(items.iter().cloned());
        true
    }

    fn paste(&self, mime_type: &MimeType, data: &ClipboardPayload) -> bool {
        if *self.refuse_paste.lock() {
            return false;
        }
        self.pasted.lock().push(ClipboardItem {
            mime_type: mime_type.clone(),
            payload: data.clone(),
        });
        true
    }
}
