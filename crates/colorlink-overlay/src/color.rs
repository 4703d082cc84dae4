//! Color channel arithmetic
//!
//! Each word gets a 24-bit RGB value used as its positional identity. The low
//! [`WORD_BITS`] bits number the word inside its paragraph and the high bits
//! number the paragraph:
//!
//! ```text
//!  23                  9 8         0
//! +---------------------+-----------+
//! |   paragraph section | word sect.|
//! +---------------------+-----------+
//! ```
//!
//! A paragraph therefore holds at most 511 words and a document at most 32766
//! paragraphs; going past either bound is fatal.

use crate::error::ColorHexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest RGB value
pub const MAX_COLOR: u32 = 0x00FF_FFFF;

/// Bits used for the word section
pub const WORD_BITS: u32 = 9;

/// Step between two paragraphs, also the first color handed out
pub const PARAGRAPH_INCREMENT: u32 = 1 << WORD_BITS;

/// Mask of the word section
pub const WORD_MASK: u32 = PARAGRAPH_INCREMENT - 1;

/// Mask of the paragraph section
pub const PARAGRAPH_MASK: u32 = MAX_COLOR - WORD_MASK;

/// 24-bit color marker, written as 6 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorHex(u32);

impl ColorHex {
    /// Create a marker from a color value
    ///
    /// # Errors
    /// Values above [`MAX_COLOR`] are rejected.
    pub fn new(value: u32) -> Result<Self, ColorHexError> {
        if value > MAX_COLOR {
            return Err(ColorHexError {
                value: format!("{value:x}"),
            });
        }
        Ok(Self(value))
    }

    /// Color of word `word` (0-based) in the `paragraph`-th walked paragraph
    /// (0-based), as assigned by a pass that started from a fresh counter.
    ///
    /// # Errors
    /// Fails when the position lies outside the color space.
    pub fn for_word(paragraph: u32, word: u32) -> Result<Self, ColorHexError> {
        let base = paragraph
            .checked_add(1)
            .and_then(|p| p.checked_mul(PARAGRAPH_INCREMENT));
        match base {
            Some(base) if word <= WORD_MASK && base <= PARAGRAPH_MASK => Self::new(base + word),
            _ => Err(ColorHexError {
                value: format!("paragraph {paragraph} word {word}"),
            }),
        }
    }

    /// Parse exactly six hex digits, in either case
    ///
    /// # Errors
    /// Anything else is rejected.
    pub fn parse(text: &str) -> Result<Self, ColorHexError> {
        let invalid = || ColorHexError {
            value: text.to_string(),
        };
        if text.len() != 6 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(text, 16)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Numeric color value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ColorHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

impl FromStr for ColorHex {
    type Err = ColorHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorHex {
    type Error = ColorHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorHex> for String {
    fn from(hex: ColorHex) -> Self {
        hex.to_string()
    }
}

/// Color space exhausted while advancing the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOverflow {
    /// Word section wrapped inside a paragraph
    Word,
    /// Paragraph section wrapped to zero
    Paragraph,
}

/// Running color counter of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCounter {
    value: u32,
}

impl Default for ColorCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCounter {
    /// Counter at the first color, [`PARAGRAPH_INCREMENT`]
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: PARAGRAPH_INCREMENT,
        }
    }

    /// Current raw value
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Current color as a marker
    #[inline]
    #[must_use]
    pub const fn current(&self) -> ColorHex {
        // value stays within MAX_COLOR: every overflow is reported before use
        ColorHex(self.value & MAX_COLOR)
    }

    /// Step to the next word color
    ///
    /// # Errors
    /// [`CounterOverflow::Word`] once the word section wraps.
    pub fn advance_word(&mut self) -> Result<(), CounterOverflow> {
        self.value += 1;
        if self.value & WORD_MASK == 0 {
            return Err(CounterOverflow::Word);
        }
        Ok(())
    }

    /// Step to the first color of the next paragraph
    ///
    /// # Errors
    /// [`CounterOverflow::Paragraph`] once the paragraph section wraps to zero.
    pub fn end_paragraph(&mut self) -> Result<(), CounterOverflow> {
        self.value = (self.value + PARAGRAPH_INCREMENT) & PARAGRAPH_MASK;
        if self.value == 0 {
            return Err(CounterOverflow::Paragraph);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn constants() {
        assert_eq!(PARAGRAPH_INCREMENT, 0x200);
        assert_eq!(WORD_MASK, 0x1FF);
        assert_eq!(PARAGRAPH_MASK, 0x00FF_FE00);
    }

    #[test]
    fn hex_formatting_pads_and_lowercases() {
        assert_eq!(ColorHex::new(0x200).unwrap().to_string(), "000200");
        assert_eq!(ColorHex::new(0xABCDEF).unwrap().to_string(), "abcdef");
        assert_eq!(ColorHex::parse("ABCDEF").unwrap().value(), 0xABCDEF);
    }

    #[test]
    fn parse_rejects_bad_markers() {
        for bad in ["", "200", "0002000", "00020g", "+00200", " 00200"] {
            assert!(ColorHex::parse(bad).is_err(), "{bad:?} accepted");
        }
        assert!(ColorHex::new(0x0100_0000).is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let hex = ColorHex::new(0x000401).unwrap();
        assert_eq!(serde_json::to_string(&hex).unwrap(), "\"000401\"");
        let back: ColorHex = serde_json::from_str("\"000401\"").unwrap();
        assert_eq!(back, hex);
        assert!(serde_json::from_str::<ColorHex>("\"zz\"").is_err());
    }

    #[test]
    fn for_word_matches_counter_layout() {
        assert_eq!(ColorHex::for_word(0, 0).unwrap().value(), 0x200);
        assert_eq!(ColorHex::for_word(1, 2).unwrap().value(), 0x402);
        assert!(ColorHex::for_word(0, 512).is_err());
        assert!(ColorHex::for_word(0x7FFF, 0).is_err());
        assert!(ColorHex::for_word(0x7FFE, 0).is_ok());
    }

    #[test]
    fn counter_starts_at_first_paragraph() {
        let counter = ColorCounter::new();
        assert_eq!(counter.current().to_string(), "000200");
    }

    #[test]
    fn word_section_overflows_at_512() {
        let mut counter = ColorCounter::new();
        for _ in 0..511 {
            counter.advance_word().unwrap();
        }
        assert_eq!(counter.value(), 0x3FF);
        assert_eq!(counter.advance_word(), Err(CounterOverflow::Word));
    }

    #[test]
    fn paragraph_section_overflows_at_32767() {
        let mut counter = ColorCounter::new();
        for _ in 0..32766 {
            counter.advance_word().unwrap();
            counter.end_paragraph().unwrap();
        }
        assert_eq!(counter.value(), 0x00FF_FE00);
        counter.advance_word().unwrap();
        assert_eq!(counter.end_paragraph(), Err(CounterOverflow::Paragraph));
    }

    proptest! {
        #[test]
        fn paragraph_end_resets_word_section(paragraph in 0u32..0x7FFE, words in 0u32..512) {
            let mut counter = ColorCounter {
                value: (paragraph + 1) * PARAGRAPH_INCREMENT + words.min(WORD_MASK),
            };
            counter.end_paragraph().unwrap();
            prop_assert_eq!(counter.value() & WORD_MASK, 0);
            prop_assert_eq!(counter.value(), (paragraph + 2) * PARAGRAPH_INCREMENT);
        }

        #[test]
        fn colors_never_exceed_max(steps in proptest::collection::vec(0u32..520, 1..64)) {
            let mut counter = ColorCounter::new();
            for words in steps {
                for _ in 0..words {
                    if counter.advance_word().is_err() {
                        return Ok(());
                    }
                    prop_assert!(counter.value() <= MAX_COLOR);
                }
                if counter.end_paragraph().is_err() {
                    return Ok(());
                }
                prop_assert!(counter.value() <= MAX_COLOR);
            }
        }

        #[test]
        fn display_parse_roundtrip(value in 0u32..=MAX_COLOR) {
            let hex = ColorHex::new(value).unwrap();
            prop_assert_eq!(ColorHex::parse(&hex.to_string()).unwrap(), hex);
        }
    }
}
