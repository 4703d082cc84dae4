//! Overlay linker
//!
//! Runs two independent span trackers over the encoder's color stream, one for
//! definitions and one for references. A tracker opens when the current color
//! is a known start marker and closes when it equals the end marker of the
//! open span; one word can do both. On close the span from the first word's
//! start to the current word's end gets a `HyperLinkURL` and its range is
//! kept as an anchor.

use crate::anchors::AnchorMap;
use crate::color::ColorHex;
use crate::config::OverlayConfig;
use crate::encoder::{ColorCursorEncoder, PassReport, Word, WordVisitor};
use crate::error::OverlayError;
use crate::terms::TermTable;
use colorlink_engine::properties::{HYPERLINK_URL, UNVISITED_CHAR_STYLE_NAME, VISITED_CHAR_STYLE_NAME};
use colorlink_engine::{
    BatchUpdate, PropertyValue, RangeOf, Text, TextCursor, TextDocument, WordCursor,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Span kept open by a tracker
#[derive(Debug, Clone)]
struct OpenSpan<R> {
    /// Collapsed range at the first word's start
    start: R,
    /// Start marker of the definition the span belongs to
    owner: ColorHex,
    /// Color that closes the span
    end: ColorHex,
}

#[derive(Debug, Clone)]
enum Track<R> {
    Idle,
    Open(OpenSpan<R>),
}

impl<R> Track<R> {
    fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Take the open span if `color` closes it, leaving the track idle
    fn close_at(&mut self, color: ColorHex) -> Option<OpenSpan<R>> {
        if !matches!(self, Self::Open(span) if span.end == color) {
            return None;
        }
        match std::mem::replace(self, Self::Idle) {
            Self::Open(span) => Some(span),
            Self::Idle => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Definition,
    Reference,
}

/// Result of an overlay pass
#[derive(Debug)]
pub struct Annotation<R> {
    /// Counters of the pass
    pub report: PassReport,
    /// Anchors created by the pass
    pub anchors: AnchorMap<R>,
}

/// Overlay pass stopped by a fatal error
///
/// Hyperlinks written before the failure stay in the document; `partial`
/// holds their anchors so they remain navigable.
#[derive(Debug, thiserror::Error)]
#[error("overlay pass aborted after {} anchors", .partial.anchors.len())]
pub struct PassAborted<R: std::fmt::Debug> {
    /// Why the pass stopped
    #[source]
    pub error: OverlayError,
    /// Counters and anchors up to the failing word
    pub partial: Annotation<R>,
}

impl<R: std::fmt::Debug> PassAborted<R> {
    /// Drop the partial anchors, keeping the cause
    #[must_use]
    pub fn into_error(self) -> OverlayError {
        self.error
    }
}

/// Word visitor turning matched color spans into hyperlink anchors
#[derive(Debug)]
pub struct OverlayLinker<'a, T: Text> {
    text: &'a T,
    table: &'a TermTable,
    config: &'a OverlayConfig,
    definition: Track<T::Range>,
    reference: Track<T::Range>,
    anchors: AnchorMap<T::Range>,
}

impl<'a, T: Text> OverlayLinker<'a, T> {
    /// Linker over a text, matching against `table`
    pub fn new(text: &'a T, table: &'a TermTable, config: &'a OverlayConfig) -> Self {
        Self {
            text,
            table,
            config,
            definition: Track::Idle,
            reference: Track::Idle,
            anchors: AnchorMap::new(),
        }
    }

    /// Whether a definition span is open
    #[must_use]
    pub fn definition_open(&self) -> bool {
        !self.definition.is_idle()
    }

    /// Whether a reference span is open
    #[must_use]
    pub fn reference_open(&self) -> bool {
        !self.reference.is_idle()
    }

    /// Anchors collected so far
    #[must_use]
    pub fn into_anchors(self) -> AnchorMap<T::Range> {
        self.anchors
    }

    fn open_definition(&mut self, word: &Word<'_, T::WordCursor>) {
        if !self.definition.is_idle() {
            return;
        }
        let Some(definition) = self.table.definition(word.color) else {
            return;
        };
        debug!(
            term_start_hex = %definition.term_start_hex,
            name = %definition.name,
            paragraph = word.paragraph,
            "definition opened"
        );
        self.definition = Track::Open(OpenSpan {
            start: word.cursor.start(),
            owner: definition.term_start_hex,
            end: definition.term_end_hex,
        });
    }

    fn open_reference(&mut self, word: &Word<'_, T::WordCursor>) {
        if !self.reference.is_idle() {
            return;
        }
        let Some(reference) = self.table.reference(word.color) else {
            return;
        };
        debug!(
            reference_start_hex = %word.color,
            term_start_hex = %reference.term_start_hex,
            paragraph = word.paragraph,
            "reference opened"
        );
        self.anchors.ensure_references(reference.term_start_hex);
        self.reference = Track::Open(OpenSpan {
            start: word.cursor.start(),
            owner: reference.term_start_hex,
            end: reference.marker.reference_end_hex,
        });
    }

    /// Select the span with a fresh text cursor, write its properties and
    /// return its range. `None` when the engine withholds the range.
    fn materialize(
        &self,
        span: &OpenSpan<T::Range>,
        word_end: &T::Range,
        kind: SpanKind,
    ) -> Option<T::Range> {
        let mut cursor = self.text.create_text_cursor();
        cursor.goto_range(&span.start, false);
        cursor.goto_range(word_end, true);

        let properties = match kind {
            SpanKind::Definition => vec![
                (HYPERLINK_URL, PropertyValue::string(self.config.definition_uri(span.owner))),
                (VISITED_CHAR_STYLE_NAME, PropertyValue::string(&self.config.visited_style)),
                (UNVISITED_CHAR_STYLE_NAME, PropertyValue::string(&self.config.unvisited_style)),
            ],
            SpanKind::Reference => vec![(
                HYPERLINK_URL,
                PropertyValue::string(self.config.reference_uri(span.owner)),
            )],
        };

        match cursor.as_property_set() {
            Some(props) => {
                for (name, value) in properties {
                    if let Err(e) = props.set_property_value(name, value) {
                        warn!(term_start_hex = %span.owner, property = name, error = %e, "failed to set span property");
                    }
                }
            }
            None => warn!(term_start_hex = %span.owner, ?kind, "span cursor has no property access"),
        }

        cursor.as_text_range()
    }

    fn close(
        &mut self,
        span: &OpenSpan<T::Range>,
        word: &Word<'_, T::WordCursor>,
        kind: SpanKind,
        report: &mut PassReport,
    ) {
        let Some(range) = self.materialize(span, &word.cursor.end(), kind) else {
            warn!(term_start_hex = %span.owner, ?kind, "span could not be materialized as a range");
            report.unresolved_spans += 1;
            return;
        };

        debug!(term_start_hex = %span.owner, ?kind, paragraph = word.paragraph, "anchor created");
        match kind {
            SpanKind::Definition => {
                self.anchors.insert_definition(span.owner, range);
                report.definitions_matched += 1;
            }
            SpanKind::Reference => {
                self.anchors.push_reference(span.owner, range);
                report.references_matched += 1;
            }
        }
    }
}

impl<T: Text> WordVisitor<T::WordCursor> for OverlayLinker<'_, T> {
    fn visit(&mut self, word: &Word<'_, T::WordCursor>, report: &mut PassReport) {
        self.open_definition(word);
        if let Some(span) = self.definition.close_at(word.color) {
            self.close(&span, word, SpanKind::Definition, report);
        }

        self.open_reference(word);
        if let Some(span) = self.reference.close_at(word.color) {
            self.close(&span, word, SpanKind::Reference, report);
        }
    }
}

/// Overlay pass over a whole document
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    config: OverlayConfig,
    cancel: CancellationToken,
}

impl Annotator {
    /// Annotator with the given anchor settings
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the pass before the next word once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Anchor settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Link every definition and reference of `table` found in the document.
    ///
    /// The pass runs inside a batch update. The temporary colors are left in
    /// place, and running the pass twice on the same document is not
    /// guaranteed to be safe.
    ///
    /// # Errors
    /// Color space exhaustion or a failing range comparison. Nothing is rolled
    /// back: the returned [`PassAborted`] carries the anchors created before
    /// the failure.
    pub fn annotate<D>(
        &self,
        document: &D,
        table: &TermTable,
    ) -> Result<Annotation<RangeOf<D>>, PassAborted<RangeOf<D>>>
    where
        D: TextDocument,
    {
        info!(
            definitions = table.definition_count(),
            references = table.reference_count(),
            "overlay pass started"
        );
        let batch = BatchUpdate::begin(document);
        let text = document.text();

        let mut linker = OverlayLinker::new(&text, table, &self.config);
        let mut report = PassReport::default();
        let walked = ColorCursorEncoder::new(&text)
            .with_cancellation(self.cancel.clone())
            .run_into(&mut linker, &mut report);

        if linker.definition_open() || linker.reference_open() {
            debug!(
                definition_open = linker.definition_open(),
                reference_open = linker.reference_open(),
                "pass ended with an open span"
            );
        }
        batch.finish();

        let annotation = Annotation {
            report,
            anchors: linker.into_anchors(),
        };
        if let Err(error) = walked {
            warn!(
                error = %error,
                anchors = annotation.anchors.len(),
                references = annotation.anchors.reference_count(),
                "overlay pass aborted, keeping anchors created so far"
            );
            return Err(PassAborted {
                error,
                partial: annotation,
            });
        }

        info!(
            definitions_matched = annotation.report.definitions_matched,
            references_matched = annotation.report.references_matched,
            unresolved_spans = annotation.report.unresolved_spans,
            cancelled = annotation.report.cancelled,
            "overlay pass finished"
        );
        Ok(annotation)
    }
}
