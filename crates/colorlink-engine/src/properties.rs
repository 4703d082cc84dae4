//! Character properties
//!
//! Only the four properties the overlay needs are modelled. Values are typed
//! so a color can never be written into a style name.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Foreground color of the characters in a range (24-bit RGB as a long)
pub const CHAR_COLOR: &str = "CharColor";
/// Hyperlink target of a range
pub const HYPERLINK_URL: &str = "HyperLinkURL";
/// Character style used once a link was visited
pub const VISITED_CHAR_STYLE_NAME: &str = "VisitedCharStyleName";
/// Character style used for unvisited links
pub const UNVISITED_CHAR_STYLE_NAME: &str = "UnvisitedCharStyleName";

/// Property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// No value, or mixed values across a range
    Void,
    /// Integer value
    Long(i64),
    /// String value
    String(String),
}

impl PropertyValue {
    /// Color value
    #[inline]
    #[must_use]
    pub fn color(rgb: u32) -> Self {
        Self::Long(i64::from(rgb))
    }

    /// String value
    #[inline]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Integer payload
    #[inline]
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this is [`PropertyValue::Void`]
    #[inline]
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

/// Property access on a range or cursor selection
pub trait PropertySet {
    /// Read a property. Mixed values over the range read as [`PropertyValue::Void`].
    ///
    /// # Errors
    /// Unknown property names.
    fn property_value(&self, name: &str) -> Result<PropertyValue, EngineError>;

    /// Write a property over the whole range
    ///
    /// # Errors
    /// Unknown property names or mismatched value types.
    fn set_property_value(&self, name: &str, value: PropertyValue) -> Result<(), EngineError>;
}

/// Check a property name/value pair against the known property table
///
/// # Errors
/// [`EngineError::UnknownProperty`] or [`EngineError::PropertyType`].
pub fn validate(name: &str, value: &PropertyValue) -> Result<(), EngineError> {
    let expected = match name {
        CHAR_COLOR => "long",
        HYPERLINK_URL | VISITED_CHAR_STYLE_NAME | UNVISITED_CHAR_STYLE_NAME => "string",
        other => return Err(EngineError::UnknownProperty(other.to_string())),
    };

    let ok = match (expected, value) {
        (_, PropertyValue::Void) => true,
        ("long", PropertyValue::Long(_)) | ("string", PropertyValue::String(_)) => true,
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(EngineError::PropertyType {
            name: name.to_string(),
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_matching_types() {
        assert!(validate(CHAR_COLOR, &PropertyValue::color(0x00_02_01)).is_ok());
        assert!(validate(HYPERLINK_URL, &PropertyValue::string("term://000201")).is_ok());
        assert!(validate(VISITED_CHAR_STYLE_NAME, &PropertyValue::Void).is_ok());
    }

    #[test]
    fn validate_rejects_mismatch() {
        assert!(matches!(
            validate(CHAR_COLOR, &PropertyValue::string("red")),
            Err(EngineError::PropertyType { .. })
        ));
        assert!(matches!(
            validate("CharWeight", &PropertyValue::Long(700)),
            Err(EngineError::UnknownProperty(_))
        ));
    }

    #[test]
    fn color_is_long() {
        assert_eq!(PropertyValue::color(0xFF_FF_FF).as_long(), Some(0xFF_FF_FF));
        assert_eq!(PropertyValue::string("x").as_long(), None);
    }
}
