//! Configuration file of the `colorlink` binary
//!
//! ```toml
//! [overlay]
//! definition_scheme = "term"
//! reference_scheme = "termref"
//!
//! [clipboard]
//! desired_mime_types = ["text/plain", "text/html"]
//!
//! [logging]
//! filter = "colorlink_overlay=debug,info"
//! json = false
//! ```
//!
//! Missing sections and keys fall back to their defaults.

use anyhow::{bail, Context, Result};
use colorlink_clipboard::ClipboardConfig;
use colorlink_overlay::OverlayConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log filter used when neither `RUST_LOG` nor the file sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Logging section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorlinkConfig {
    /// Overlay linker and colorize job
    pub overlay: OverlayConfig,
    /// Clipboard arbitration
    pub clipboard: ClipboardConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl ColorlinkConfig {
    /// Parse and validate TOML text
    ///
    /// # Errors
    /// Malformed TOML or a value rejected by [`validate`](Self::validate).
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file
    ///
    /// # Errors
    /// The file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config {}", path.display()))
    }

    /// Defaults when `path` is `None`, otherwise the file at `path`
    ///
    /// # Errors
    /// See [`from_file`](Self::from_file).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Reject values the passes cannot work with
    ///
    /// # Errors
    /// Empty or malformed URI schemes, an empty export filter or a zero queue
    /// capacity.
    pub fn validate(&self) -> Result<()> {
        for (key, scheme) in [
            ("overlay.definition_scheme", &self.overlay.definition_scheme),
            ("overlay.reference_scheme", &self.overlay.reference_scheme),
        ] {
            if !is_scheme(scheme) {
                bail!("{key} must be a URI scheme, got {scheme:?}");
            }
        }
        if self.overlay.definition_scheme == self.overlay.reference_scheme {
            bail!("definition and reference schemes must differ");
        }
        if self.overlay.export_filter.trim().is_empty() {
            bail!("overlay.export_filter must not be empty");
        }
        if self.clipboard.queue_capacity == 0 {
            bail!("clipboard.queue_capacity must be at least 1");
        }
        Ok(())
    }

    /// Effective configuration as TOML
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
