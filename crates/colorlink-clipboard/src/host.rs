//! Host (OS) clipboard boundary

use crate::error::HostClipboardError;
use async_trait::async_trait;
use colorlink_engine::{ClipboardItem, MimeType};

/// Clipboard of the host shell
#[async_trait]
pub trait HostClipboard: Send + Sync {
    /// Read the available items among `mime_types`, at most one per type
    async fn read(&self, mime_types: &[MimeType]) -> Result<Vec<ClipboardItem>, HostClipboardError>;

    /// Replace the host clipboard content with `items`
    async fn write(&self, items: Vec<ClipboardItem>) -> Result<(), HostClipboardError>;
}
