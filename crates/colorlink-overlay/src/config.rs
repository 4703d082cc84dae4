//! Overlay configuration

use serde::{Deserialize, Serialize};

/// Default URI scheme of definition anchors
pub const DEFAULT_DEFINITION_SCHEME: &str = "term";

/// Default URI scheme of reference anchors
pub const DEFAULT_REFERENCE_SCHEME: &str = "termref";

/// Default char style of visited definition links
pub const DEFAULT_VISITED_STYLE: &str = "Visited Internet Link";

/// Default char style of unvisited definition links
pub const DEFAULT_UNVISITED_STYLE: &str = "Internet Link";

/// Default export filter of the colorize job
pub const DEFAULT_EXPORT_FILTER: &str = "colorlink_json_Export";

/// Settings for anchors written by the overlay linker and the colorize job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// URI scheme of definition anchors
    pub definition_scheme: String,
    /// URI scheme of reference anchors
    pub reference_scheme: String,
    /// `VisitedCharStyleName` set on definition anchors
    pub visited_style: String,
    /// `UnvisitedCharStyleName` set on definition anchors
    pub unvisited_style: String,
    /// Filter name passed to the export of the colorize job
    pub export_filter: String,
}

impl OverlayConfig {
    /// Create configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the definition URI scheme
    #[must_use]
    pub fn with_definition_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.definition_scheme = scheme.into();
        self
    }

    /// Set the reference URI scheme
    #[must_use]
    pub fn with_reference_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.reference_scheme = scheme.into();
        self
    }

    /// Set both link char styles
    #[must_use]
    pub fn with_link_styles(
        mut self,
        visited: impl Into<String>,
        unvisited: impl Into<String>,
    ) -> Self {
        self.visited_style = visited.into();
        self.unvisited_style = unvisited.into();
        self
    }

    /// Set the export filter
    #[must_use]
    pub fn with_export_filter(mut self, filter: impl Into<String>) -> Self {
        self.export_filter = filter.into();
        self
    }

    /// URI of a definition anchor
    #[must_use]
    pub fn definition_uri(&self, term_start_hex: impl std::fmt::Display) -> String {
        format!("{}://{term_start_hex}", self.definition_scheme)
    }

    /// URI of a reference anchor
    #[must_use]
    pub fn reference_uri(&self, term_start_hex: impl std::fmt::Display) -> String {
        format!("{}://{term_start_hex}", self.reference_scheme)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            definition_scheme: DEFAULT_DEFINITION_SCHEME.to_string(),
            reference_scheme: DEFAULT_REFERENCE_SCHEME.to_string(),
            visited_style: DEFAULT_VISITED_STYLE.to_string(),
            unvisited_style: DEFAULT_UNVISITED_STYLE.to_string(),
            export_filter: DEFAULT_EXPORT_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uris() {
        let config = OverlayConfig::default();
        assert_eq!(config.definition_uri("000200"), "term://000200");
        assert_eq!(config.reference_uri("000200"), "termref://000200");
    }

    #[test]
    fn builders_override_fields() {
        let config = OverlayConfig::new()
            .with_definition_scheme("def")
            .with_link_styles("Seen", "Unseen")
            .with_export_filter("writer_pdf_Export");
        assert_eq!(config.definition_uri("abcdef"), "def://abcdef");
        assert_eq!(config.reference_scheme, DEFAULT_REFERENCE_SCHEME);
        assert_eq!(config.visited_style, "Seen");
        assert_eq!(config.export_filter, "writer_pdf_Export");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{"reference_scheme": "ref"}"#).unwrap();
        assert_eq!(config.reference_scheme, "ref");
        assert_eq!(config.definition_scheme, DEFAULT_DEFINITION_SCHEME);
    }
}
