//! Clipboard arbiter
//!
//! Keeps the document clipboard and the host clipboard in sync without
//! feedback loops:
//!
//! - **Outbound** (local copy): document items are written to the host with a
//!   stamp item recording the write time.
//! - **Inbound** (read opportunity): host items are imported into the document
//!   unless the host still carries our own stamp (or an older one).
//! - **Paste** (paste request): an inbound import, then the preferred
//!   representation on the document clipboard is pasted at the selection.
//!
//! Decisions are serialized through one async lock, so two events never race
//! over the last written stamp. Failures are logged and reported as outcomes;
//! nothing is raised to the caller.

use crate::config::ClipboardConfig;
use crate::error::ClipboardError;
use crate::host::HostClipboard;
use crate::stamp::{Clock, HostStamp, Stamp, SystemClock};
use colorlink_engine::{ClipboardItem, DocumentClipboard, MimeType};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of a local copy
#[derive(Debug)]
pub enum OutboundOutcome {
    /// Items and stamp written to the host
    Written {
        /// Real items written, without the stamp
        items: usize,
        /// Stamp written with them
        stamp: Stamp,
    },
    /// Document clipboard had nothing in the desired types
    Empty,
    /// Read or write failed; nothing changed
    Failed(ClipboardError),
}

/// Result of a host read opportunity
#[derive(Debug)]
pub enum InboundOutcome {
    /// Host items imported into the document
    Imported {
        /// Items imported
        items: usize,
    },
    /// Host content is our own last write
    Echo,
    /// Host clipboard had nothing in the desired types
    Empty,
    /// Read or import failed; nothing changed
    Failed(ClipboardError),
}

/// Result of a paste request
#[derive(Debug)]
pub enum PasteOutcome {
    /// A representation was pasted into the document
    Pasted {
        /// Type that was pasted
        mime_type: MimeType,
        /// Whether host content was imported first
        imported: bool,
    },
    /// Neither clipboard had anything in the desired types
    Empty,
    /// Document clipboard unreadable or the paste was refused
    Failed(ClipboardError),
}

#[derive(Debug, Default)]
struct ArbiterState {
    last_written: Option<Stamp>,
}

/// Arbiter between one document clipboard and the host clipboard
pub struct ClipboardArbiter {
    document: Arc<dyn DocumentClipboard>,
    host: Arc<dyn HostClipboard>,
    clock: Arc<dyn Clock>,
    config: ClipboardConfig,
    state: Mutex<ArbiterState>,
}

impl std::fmt::Debug for ClipboardArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardArbiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClipboardArbiter {
    /// Arbiter using the system clock and default configuration
    pub fn new(document: Arc<dyn DocumentClipboard>, host: Arc<dyn HostClipboard>) -> Self {
        Self {
            document,
            host,
            clock: Arc::new(SystemClock),
            config: ClipboardConfig::default(),
            state: Mutex::new(ArbiterState::default()),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: ClipboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClipboardConfig {
        &self.config
    }

    /// Stamp of the last successful outbound write
    pub async fn last_written_stamp(&self) -> Option<Stamp> {
        self.state.lock().await.last_written
    }

    /// Push the document clipboard to the host after a local copy
    pub async fn on_local_copy(&self) -> OutboundOutcome {
        let mut state = self.state.lock().await;

        let items = match self.document.get_clipboard(&self.document_queries()) {
            Ok(items) => one_per_type(items),
            Err(e) => {
                warn!(error = %e, "failed to read document clipboard");
                return OutboundOutcome::Failed(e.into());
            }
        };
        if items.is_empty() {
            debug!("document clipboard empty, nothing to write");
            return OutboundOutcome::Empty;
        }

        let stamp = Stamp::next(self.clock.as_ref(), state.last_written);
        let mut outgoing = compose(items);
        let count = outgoing.len();
        outgoing.push(stamp.to_item(&self.config.metadata_mime_type));

        if let Err(e) = self.host.write(outgoing).await {
            warn!(error = %e, "failed to write host clipboard");
            return OutboundOutcome::Failed(e.into());
        }

        state.last_written = Some(stamp);
        info!(items = count, %stamp, "document clipboard written to host");
        OutboundOutcome::Written {
            items: count,
            stamp,
        }
    }

    /// Import the host clipboard into the document unless it is our own echo
    pub async fn on_host_read_opportunity(&self) -> InboundOutcome {
        let state = self.state.lock().await;
        self.import(&state).await
    }

    /// Paste into the document at its selection
    ///
    /// Foreign host content is imported first, so the paste sees what the
    /// user last copied anywhere. The first desired type present on the
    /// document clipboard is pasted. A failed host read only skips the
    /// import.
    pub async fn on_paste_request(&self) -> PasteOutcome {
        let state = self.state.lock().await;

        let imported = match self.import(&state).await {
            InboundOutcome::Imported { .. } => true,
            InboundOutcome::Failed(e) => {
                debug!(error = %e, "pasting without host import");
                false
            }
            InboundOutcome::Echo | InboundOutcome::Empty => false,
        };

        let items = match self.document.get_clipboard(&self.document_queries()) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "failed to read document clipboard for paste");
                return PasteOutcome::Failed(e.into());
            }
        };
        let Some(item) = items.into_iter().next() else {
            debug!("nothing to paste");
            return PasteOutcome::Empty;
        };

        if !self.document.paste(&item.mime_type, &item.payload) {
            warn!(mime_type = %item.mime_type, "document refused paste");
            return PasteOutcome::Failed(ClipboardError::PasteRejected(item.mime_type));
        }

        info!(mime_type = %item.mime_type, imported, "pasted into document");
        PasteOutcome::Pasted {
            mime_type: item.mime_type,
            imported,
        }
    }

    fn document_queries(&self) -> Vec<String> {
        self.config
            .desired_mime_types
            .iter()
            .map(MimeType::query_str)
            .collect()
    }

    async fn import(&self, state: &ArbiterState) -> InboundOutcome {
        let mut wanted = self.config.desired_mime_types.clone();
        wanted.push(self.config.metadata_mime_type.clone());
        let host_items = match self.host.read(&wanted).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "failed to read host clipboard");
                return InboundOutcome::Failed(e.into());
            }
        };

        let host_stamp = HostStamp::find(&host_items, &self.config.metadata_mime_type);
        if !should_import(state.last_written, host_stamp) {
            debug!(?host_stamp, "host clipboard holds our own write, skipping");
            return InboundOutcome::Echo;
        }

        let items: Vec<ClipboardItem> = one_per_type(
            host_items
                .into_iter()
                .filter(|item| item.mime_type != self.config.metadata_mime_type)
                .filter(|item| self.config.desired_mime_types.contains(&item.mime_type))
                .collect(),
        );
        if items.is_empty() {
            debug!("host clipboard has no desired representation");
            return InboundOutcome::Empty;
        }

        if !self.document.set_clipboard(&items) {
            warn!(items = items.len(), "document clipboard refused import");
            return InboundOutcome::Failed(ClipboardError::ImportRejected(items.len()));
        }

        info!(items = items.len(), ?host_stamp, "host clipboard imported");
        InboundOutcome::Imported { items: items.len() }
    }
}

/// Import decision: foreign content is anything not stamped by us at or after
/// our last write
fn should_import(last_written: Option<Stamp>, host: HostStamp) -> bool {
    match (last_written, host) {
        (None, _) | (_, HostStamp::Missing | HostStamp::Unparseable) => true,
        (Some(last), HostStamp::Present(stamp)) => stamp > last,
    }
}

/// Keep the first item of every MIME type
fn one_per_type(items: Vec<ClipboardItem>) -> Vec<ClipboardItem> {
    let mut kept: Vec<ClipboardItem> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.iter().any(|k| k.mime_type == item.mime_type) {
            kept.push(item);
        }
    }
    kept
}

/// Drop bare `text/plain` when a richer representation travels with it
fn compose(items: Vec<ClipboardItem>) -> Vec<ClipboardItem> {
    if items.len() > 1 {
        items
            .into_iter()
            .filter(|item| item.mime_type != MimeType::PlainText)
            .collect()
    } else {
        items
    }
}
