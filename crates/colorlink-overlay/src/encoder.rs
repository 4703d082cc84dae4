//! Color-channel position encoder
//!
//! [`ColorCursorEncoder`] walks the document paragraph by paragraph and word by
//! word, handing every word and its color to a [`WordVisitor`]. The colorize
//! pass writes the color into the word, the overlay linker matches it against
//! the term table. Both see exactly the same sequence of colors, which is what
//! lets the linker find words colored by an earlier run.
//!
//! The walk never trusts `goto_next_word`'s return value. A paragraph ends
//! when the cursor no longer starts strictly before the paragraph end.

use crate::color::{ColorCounter, ColorHex, CounterOverflow};
use crate::error::OverlayError;
use colorlink_engine::{
    ParagraphElement, RegionOrder, Text, TextRange, WordCursor,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome counters of a pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Definition anchors created
    pub definitions_matched: usize,
    /// Reference anchors created
    pub references_matched: usize,
    /// Paragraphs walked to the end
    pub paragraphs: usize,
    /// Table elements skipped
    pub tables_skipped: usize,
    /// Elements without a usable range, word cursor or range comparison
    pub unusable_elements: usize,
    /// Words visited
    pub words: usize,
    /// Spans (or words, when colorizing) whose properties or range could not
    /// be materialized
    pub unresolved_spans: usize,
    /// Counter value when the pass stopped, as 6 hex digits
    pub last_color: String,
    /// Whether the pass stopped on cancellation
    pub cancelled: bool,
}

/// The word currently selected by the walk
#[derive(Debug)]
pub struct Word<'a, C> {
    /// Cursor selecting the word
    pub cursor: &'a C,
    /// Color assigned to the word
    pub color: ColorHex,
    /// Element index of the paragraph in document order
    pub paragraph: usize,
    /// Index of the word in its paragraph
    pub index: usize,
}

/// Receives every word of a walk
pub trait WordVisitor<C: WordCursor> {
    /// Handle one selected word
    fn visit(&mut self, word: &Word<'_, C>, report: &mut PassReport);
}

/// Word-by-word walk assigning colors
#[derive(Debug)]
pub struct ColorCursorEncoder<'t, T> {
    text: &'t T,
    cancel: CancellationToken,
}

impl<'t, T: Text> ColorCursorEncoder<'t, T> {
    /// Encoder over a document text
    pub fn new(text: &'t T) -> Self {
        Self {
            text,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the walk before the next word once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Walk the whole document
    ///
    /// # Errors
    /// Color space exhaustion and failing range comparisons abort the walk.
    /// Side effects of visited words stay in place.
    pub fn run<V>(&self, visitor: &mut V) -> Result<PassReport, OverlayError>
    where
        V: WordVisitor<T::WordCursor>,
    {
        let mut report = PassReport::default();
        self.run_into(visitor, &mut report)?;
        Ok(report)
    }

    /// Walk the whole document, counting into `report`
    ///
    /// On error `report` still holds the counters up to the failing word, so
    /// callers can account for what the aborted walk already did.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn run_into<V>(&self, visitor: &mut V, report: &mut PassReport) -> Result<(), OverlayError>
    where
        V: WordVisitor<T::WordCursor>,
    {
        let mut counter = ColorCounter::new();
        let walked = self.walk(visitor, report, &mut counter);
        report.last_color = counter.current().to_string();
        walked
    }

    fn walk<V>(
        &self,
        visitor: &mut V,
        report: &mut PassReport,
        counter: &mut ColorCounter,
    ) -> Result<(), OverlayError>
    where
        V: WordVisitor<T::WordCursor>,
    {
        let Some(paragraphs) = self.text.paragraphs() else {
            info!("document has no paragraphs to walk");
            return Ok(());
        };

        for (index, element) in paragraphs.enumerate() {
            if let Some(table) = element.as_text_table() {
                debug!(paragraph = index, table = %table.name(), "skipping table");
                report.tables_skipped += 1;
                continue;
            }
            let Some(range) = element.as_text_range() else {
                warn!(paragraph = index, "element is neither table nor text range");
                report.unusable_elements += 1;
                continue;
            };
            let (Some(mut cursor), Some(compare)) = (
                self.text.create_word_cursor_by_range(&range),
                self.text.as_range_compare(),
            ) else {
                warn!(paragraph = index, "no word cursor or range comparison for paragraph");
                report.unusable_elements += 1;
                continue;
            };

            let paragraph_end = range.end();
            let mut words = 0usize;

            loop {
                if self.cancel.is_cancelled() {
                    info!(
                        paragraphs = report.paragraphs,
                        words = report.words,
                        "walk cancelled"
                    );
                    report.cancelled = true;
                    return Ok(());
                }

                cursor.goto_start_of_word(false);
                cursor.goto_end_of_word(true);

                let word = Word {
                    cursor: &cursor,
                    color: counter.current(),
                    paragraph: index,
                    index: words,
                };
                visitor.visit(&word, report);
                words += 1;
                report.words += 1;

                if let Err(CounterOverflow::Word) = counter.advance_word() {
                    let word = cursor.string();
                    error!(paragraph = index, words, word = %word, "ran out of word colors");
                    return Err(OverlayError::WordColorSpaceExhausted {
                        paragraph: index,
                        words,
                        word,
                    });
                }

                cursor.goto_next_word(false);
                let order = compare.compare_region_starts(&cursor.start(), &paragraph_end)?;
                if order != RegionOrder::Before {
                    break;
                }
            }

            report.paragraphs += 1;
            if counter.end_paragraph().is_err() {
                error!(paragraphs = report.paragraphs, "ran out of paragraph colors");
                return Err(OverlayError::ParagraphColorSpaceExhausted {
                    paragraphs: report.paragraphs,
                });
            }
        }

        info!(
            paragraphs = report.paragraphs,
            words = report.words,
            tables_skipped = report.tables_skipped,
            last_color = %counter.current(),
            "walk finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorlink_engine::memory::MemoryDocument;
    use colorlink_engine::TextDocument;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        words: Vec<(String, String)>,
    }

    impl<C: WordCursor> WordVisitor<C> for Recorder {
        fn visit(&mut self, word: &Word<'_, C>, _report: &mut PassReport) {
            self.words.push((word.color.to_string(), word.cursor.string()));
        }
    }

    fn walk(doc: &MemoryDocument) -> (Result<PassReport, OverlayError>, Vec<(String, String)>) {
        let text = doc.text();
        let mut recorder = Recorder::default();
        let result = ColorCursorEncoder::new(&text).run(&mut recorder);
        (result, recorder.words)
    }

    #[test]
    fn colors_follow_paragraph_and_word_index() {
        let doc = MemoryDocument::from_paragraphs(["one two", "three"]);
        let (report, words) = walk(&doc);
        let report = report.unwrap();

        assert_eq!(
            words,
            vec![
                ("000200".to_string(), "one".to_string()),
                ("000201".to_string(), "two".to_string()),
                ("000400".to_string(), "three".to_string()),
            ]
        );
        assert_eq!(report.paragraphs, 2);
        assert_eq!(report.words, 3);
        assert_eq!(report.last_color, "000600");
    }

    #[test]
    fn tables_do_not_consume_colors() {
        let doc = MemoryDocument::from_markup("alpha\n| cell |\nbeta");
        let (report, words) = walk(&doc);
        let report = report.unwrap();

        assert_eq!(report.tables_skipped, 1);
        assert_eq!(words[1], ("000400".to_string(), "beta".to_string()));
    }

    #[test]
    fn empty_paragraph_still_takes_a_color() {
        let doc = MemoryDocument::from_paragraphs(["", "word"]);
        let (_, words) = walk(&doc);
        assert_eq!(words[0], ("000200".to_string(), String::new()));
        assert_eq!(words[1], ("000400".to_string(), "word".to_string()));
    }

    #[test]
    fn no_paragraphs_is_an_empty_pass() {
        let doc = MemoryDocument::builder().build();
        let (report, words) = walk(&doc);
        let report = report.unwrap();
        assert!(words.is_empty());
        assert_eq!(report.paragraphs, 0);
        assert_eq!(report.last_color, "000200");
    }

    #[test]
    fn cancelled_token_stops_before_first_word() {
        let doc = MemoryDocument::from_paragraphs(["a b c"]);
        let text = doc.text();
        let token = CancellationToken::new();
        token.cancel();

        let mut recorder = Recorder::default();
        let report = ColorCursorEncoder::new(&text)
            .with_cancellation(token)
            .run(&mut recorder)
            .unwrap();
        assert!(report.cancelled);
        assert!(recorder.words.is_empty());
    }

    #[test]
    fn aborted_walk_keeps_counts_in_report() {
        let long: Vec<String> = (0..512).map(|i| format!("w{i}")).collect();
        let doc = MemoryDocument::from_paragraphs(["one two".to_string(), long.join(" ")]);
        let text = doc.text();
        let mut recorder = Recorder::default();
        let mut report = PassReport::default();

        let err = ColorCursorEncoder::new(&text)
            .run_into(&mut recorder, &mut report)
            .unwrap_err();

        assert!(err.is_color_space_exhausted());
        assert_eq!(report.paragraphs, 1);
        assert_eq!(report.words, 2 + 512);
        assert_eq!(recorder.words.len(), 2 + 512);
        assert!(!report.cancelled);
    }
}
