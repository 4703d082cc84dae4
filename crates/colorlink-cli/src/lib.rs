//! `colorlink` command line
//!
//! - `colorlink colorize <INPUT> -o <EXPORT>` gives every word its color and
//!   exports the document for term analysis.
//! - `colorlink annotate <INPUT> --terms <FILE>` links the analysed terms back
//!   into the document and reports the anchors.
//! - `colorlink config` prints the effective configuration.
//!
//! Interrupting a running pass cancels it at the next word; the binary then
//! exits with status 130.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Action, Invocation, OutputFormat};
pub use commands::{AnchorRow, AnnotateOutput, AnnotateRequest, Navigation, Outcome};
pub use config::{ColorlinkConfig, LoggingConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
