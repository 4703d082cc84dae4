//! Colorize pass and job
//!
//! The write side of the color channel: every word gets its counter value as
//! `CharColor`. A term file produced against the colorized export can then be
//! matched by [`Annotator`](crate::Annotator) on the original document.

use crate::config::OverlayConfig;
use crate::encoder::{ColorCursorEncoder, PassReport, Word, WordVisitor};
use crate::error::OverlayError;
use colorlink_engine::properties::CHAR_COLOR;
use colorlink_engine::{BatchUpdate, EngineError, PropertyValue, Text, TextDocument, WordCursor};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Word visitor writing each word's color
#[derive(Debug, Default)]
pub struct ColorWriter;

impl<C: WordCursor> WordVisitor<C> for ColorWriter {
    fn visit(&mut self, word: &Word<'_, C>, report: &mut PassReport) {
        let Some(props) = word.cursor.as_property_set() else {
            warn!(paragraph = word.paragraph, word = word.index, "word has no property access");
            report.unresolved_spans += 1;
            return;
        };
        if let Err(e) = props.set_property_value(CHAR_COLOR, PropertyValue::color(word.color.value())) {
            warn!(paragraph = word.paragraph, word = word.index, error = %e, "failed to color word");
            report.unresolved_spans += 1;
        }
    }
}

/// Colorize pass over a whole document
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    cancel: CancellationToken,
}

impl Colorizer {
    /// Colorizer without cancellation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the pass before the next word once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Color every word inside a batch update that is finished afterwards
    ///
    /// # Errors
    /// Color space exhaustion or a failing range comparison.
    pub fn colorize<D: TextDocument>(&self, document: &D) -> Result<PassReport, OverlayError> {
        let batch = BatchUpdate::begin(document);
        let report = self.colorize_text(&document.text())?;
        batch.finish();
        Ok(report)
    }

    fn colorize_text<T: Text>(&self, text: &T) -> Result<PassReport, OverlayError> {
        info!("colorize pass started");
        let report = ColorCursorEncoder::new(text)
            .with_cancellation(self.cancel.clone())
            .run(&mut ColorWriter)?;
        info!(
            words = report.words,
            paragraphs = report.paragraphs,
            last_color = %report.last_color,
            "colorize pass finished"
        );
        Ok(report)
    }
}

/// Colorize a document, export it and close it
///
/// The batch update is left open on success: the document is discarded right
/// after the export.
#[derive(Debug, Clone)]
pub struct ColorizeJob {
    output_url: String,
    filter_name: String,
    colorizer: Colorizer,
}

impl ColorizeJob {
    /// Job exporting to `output_url` with the configured export filter
    pub fn new(output_url: impl Into<String>, config: &OverlayConfig) -> Self {
        Self {
            output_url: output_url.into(),
            filter_name: config.export_filter.clone(),
            colorizer: Colorizer::new(),
        }
    }

    /// Stop the pass before the next word once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.colorizer = self.colorizer.with_cancellation(token);
        self
    }

    /// Export target
    #[inline]
    #[must_use]
    pub fn output_url(&self) -> &str {
        &self.output_url
    }

    /// Run the job
    ///
    /// A cancelled pass is still exported and closed.
    ///
    /// # Errors
    /// Pass failures (the batch is finished and nothing is exported), or the
    /// engine refusing the export or close.
    pub fn run<D: TextDocument>(&self, document: &D) -> Result<PassReport, OverlayError> {
        let batch = BatchUpdate::begin(document);
        let report = self.colorizer.colorize_text(&document.text())?;
        batch.abandon();

        let storable = document
            .as_storable()
            .ok_or(EngineError::CapabilityUnavailable("storable"))?;
        storable.store_to_url(&self.output_url, &self.filter_name)?;

        let closeable = document
            .as_closeable()
            .ok_or(EngineError::CapabilityUnavailable("closeable"))?;
        closeable.close(true)?;

        info!(url = %self.output_url, filter = %self.filter_name, "colorized document exported");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorlink_engine::memory::MemoryDocument;

    #[test]
    fn colorize_finishes_batch() {
        let doc = MemoryDocument::from_paragraphs(["one two"]);
        let report = Colorizer::new().colorize(&doc).unwrap();
        assert_eq!(report.words, 2);
        assert_eq!(doc.word_colors(0), vec![Some(0x200), Some(0x201)]);
        let counters = doc.batch_counters();
        assert_eq!((counters.started, counters.finished), (1, 1));
    }

    #[test]
    fn job_leaves_batch_open_and_closes() {
        let doc = MemoryDocument::from_paragraphs(["one"]);
        ColorizeJob::new("mem://out", &OverlayConfig::default())
            .run(&doc)
            .unwrap();

        let counters = doc.batch_counters();
        assert_eq!((counters.started, counters.finished), (1, 0));
        assert!(doc.is_closed());
        let stored = doc.stored_exports();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].url, "mem://out");
    }
}
