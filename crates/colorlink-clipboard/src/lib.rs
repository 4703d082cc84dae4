//! colorlink clipboard arbitration
//!
//! Reconciles the document-internal clipboard with the host clipboard.
//!
//! Every write to the host carries a stamp item (a private MIME type holding
//! the write time). When the host clipboard is read back:
//! - no stamp, or an unreadable one, means another application wrote it
//! - a stamp newer than our last write means another arbiter wrote it
//! - anything else is our own echo and is not imported
//!
//! # Example
//!
//! ```rust,ignore
//! use colorlink_clipboard::{spawn, ClipboardArbiter, ClipboardEvent};
//!
//! let arbiter = ClipboardArbiter::new(document_clipboard, host_clipboard);
//! let (handle, task) = spawn(arbiter);
//! handle.notify(ClipboardEvent::DocumentChanged { local_copy: true }).await?;
//! handle.notify(ClipboardEvent::HostReadOpportunity).await?;
//! handle.notify(ClipboardEvent::PasteRequested).await?;
//! handle.shutdown().await?;
//! task.await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod arbiter;
pub mod config;
pub mod error;
pub mod host;
pub mod service;
pub mod stamp;

// Re-exports
pub use arbiter::{ClipboardArbiter, InboundOutcome, OutboundOutcome, PasteOutcome};
pub use config::ClipboardConfig;
pub use error::{ClipboardError, HostClipboardError};
pub use host::HostClipboard;
pub use service::{spawn, ArbiterHandle, ArbiterOutcome, ClipboardEvent};
pub use stamp::{Clock, HostStamp, Stamp, SystemClock};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
