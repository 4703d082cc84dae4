//! Testing utilities for the colorlink workspace
//!
//! Shared fixtures, fakes and helpers.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use colorlink_clipboard::{Clock, HostClipboard, HostClipboardError, Stamp};
use colorlink_engine::memory::MemoryDocument;
use colorlink_engine::{ClipboardItem, MimeType};
use colorlink_overlay::{ColorHex, Definition};
use parking_lot::Mutex;

pub const QUICK_BROWN_FOX: &str = "The quick brown fox jumps";

/// Color of word `word` in walked paragraph `paragraph`, both 0-based
pub fn word_color(paragraph: u32, word: u32) -> ColorHex {
    ColorHex::for_word(paragraph, word).unwrap()
}

/// Definition spanning two word positions
pub fn definition(id: u64, name: &str, start: (u32, u32), end: (u32, u32)) -> Definition {
    Definition::new(
        id,
        name,
        word_color(start.0, start.1),
        word_color(end.0, end.1),
    )
}

/// Add a reference spanning two word positions
pub fn with_reference(definition: Definition, start: (u32, u32), end: (u32, u32)) -> Definition {
    definition.with_reference(word_color(start.0, start.1), word_color(end.0, end.1))
}

pub fn quick_brown_fox() -> MemoryDocument {
    MemoryDocument::from_paragraphs([QUICK_BROWN_FOX])
}

/// Paragraph text made of `count` distinct words
pub fn words(count: usize) -> String {
    (0..count)
        .map(|i| format!("w{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fixed starting point for clocks in tests
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(epoch())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// In-memory host clipboard with failure injection
#[derive(Debug, Default)]
pub struct FakeHostClipboard {
    items: Mutex<Vec<ClipboardItem>>,
    writes: Mutex<usize>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl FakeHostClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate another application writing the clipboard
    pub fn set_foreign(&self, items: Vec<ClipboardItem>) {
        *self.items.lock() = items;
    }

    pub fn items(&self) -> Vec<ClipboardItem> {
        self.items.lock().clone()
    }

    pub fn item(&self, mime_type: &MimeType) -> Option<ClipboardItem> {
        self.items
            .lock()
            .iter()
            .find(|i| &i.mime_type == mime_type)
            .cloned()
    }

    /// Stamp currently on the clipboard
    pub fn stamp(&self, metadata: &MimeType) -> Option<Stamp> {
        self.item(metadata)
            .and_then(|item| item.as_text().and_then(Stamp::parse))
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

#[async_trait]
impl HostClipboard for FakeHostClipboard {
    async fn read(&self, mime_types: &[MimeType]) -> Result<Vec<ClipboardItem>, HostClipboardError> {
        if *self.fail_reads.lock() {
            return Err(HostClipboardError::Unavailable("clipboard busy".into()));
        }
        let items = self.items.lock();
        Ok(mime_types
            .iter()
            .filter_map(|mime| items.iter().find(|i| &i.mime_type == mime).cloned())
            .collect())
    }

    async fn write(&self, items: Vec<ClipboardItem>) -> Result<(), HostClipboardError> {
        if *self.fail_writes.lock() {
            return Err(HostClipboardError::Rejected("write refused".into()));
        }
        *self.items.lock() = items;
        *self.writes.lock() += 1;
        Ok(())
    }
}
