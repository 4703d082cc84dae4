//! Subcommand implementations
//!
//! Documents are read from markup into the in-memory engine. The engine is
//! single threaded, so every pass runs start to finish on one blocking worker.

use crate::cli::{Action, OutputFormat};
use crate::config::ColorlinkConfig;
use anyhow::{Context, Result};
use colorlink_engine::memory::MemoryDocument;
use colorlink_engine::{TextDocument, TextRange};
use colorlink_overlay::{
    goto_definition, Annotator, ColorHex, ColorizeJob, OverlayConfig, PassAborted, PassReport,
    TermFile, TermTable,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Load a markup file into a fresh document
///
/// # Errors
/// The file cannot be read.
pub fn read_document(path: &Path) -> Result<MemoryDocument> {
    let markup = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    Ok(MemoryDocument::from_markup(&markup))
}

/// `file://` URL the in-memory engine stores to
#[must_use]
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Colorize `input` and export it to `output`
///
/// # Errors
/// Unreadable input, an exhausted color space or a failed export.
pub fn colorize(
    input: &Path,
    output: &Path,
    config: &OverlayConfig,
    cancel: CancellationToken,
) -> Result<PassReport> {
    let document = read_document(input)?;
    let report = ColorizeJob::new(file_url(output), config)
        .with_cancellation(cancel)
        .run(&document)
        .with_context(|| format!("failed to colorize {}", input.display()))?;
    info!(
        words = report.words,
        paragraphs = report.paragraphs,
        output = %output.display(),
        "colorized document exported"
    );
    Ok(report)
}

/// What `annotate` should do
#[derive(Debug, Clone, Default)]
pub struct AnnotateRequest {
    /// Markup input
    pub input: PathBuf,
    /// Term file
    pub terms: PathBuf,
    /// Definition to select afterwards, as 6 hex digits
    pub goto: Option<String>,
    /// Export destination of the linked document
    pub output: Option<PathBuf>,
}

/// One definition anchor in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorRow {
    /// Owning color
    pub term_start_hex: ColorHex,
    /// Term name from the term file
    pub name: String,
    /// Anchored text
    pub text: String,
    /// Text of every reference anchor
    pub references: Vec<String>,
}

/// Result of a `--goto`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Requested definition
    pub term_start_hex: ColorHex,
    /// View selection after the move, `None` when nothing was selected
    pub selection: Option<String>,
}

/// Report of `annotate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotateOutput {
    /// Walk counters
    pub report: PassReport,
    /// Definitions that shared a start marker
    pub collisions: usize,
    /// Definition anchors in color order
    pub anchors: Vec<AnchorRow>,
    /// Navigation result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
}

/// Link the terms of `request.terms` into `request.input`
///
/// # Errors
/// Unreadable input, a bad term file or `--goto` value, a fatal pass error or
/// a failed export.
pub fn annotate(
    request: &AnnotateRequest,
    config: &OverlayConfig,
    cancel: CancellationToken,
) -> Result<AnnotateOutput> {
    let goto = request
        .goto
        .as_deref()
        .map(ColorHex::parse)
        .transpose()
        .context("invalid --goto color")?;
    let terms = TermFile::load(&request.terms)
        .with_context(|| format!("failed to load terms {}", request.terms.display()))?;
    let table = TermTable::build(terms.into_definitions());
    let document = read_document(&request.input)?;

    let annotation = Annotator::new(config.clone())
        .with_cancellation(cancel)
        .annotate(&document, &table)
        .map_err(PassAborted::into_error)
        .with_context(|| format!("failed to annotate {}", request.input.display()))?;

    let anchors = annotation
        .anchors
        .definitions()
        .into_iter()
        .map(|(hex, range)| AnchorRow {
            term_start_hex: hex,
            name: table
                .definition(hex)
                .map(|d| d.name.clone())
                .unwrap_or_default(),
            text: range.string(),
            references: annotation
                .anchors
                .references(hex)
                .unwrap_or_default()
                .iter()
                .map(TextRange::string)
                .collect(),
        })
        .collect();

    let navigation = goto.map(|hex| {
        if !goto_definition(&document, &annotation.anchors, hex) {
            warn!(term_start_hex = %hex, "no definition anchor to select");
        }
        Navigation {
            term_start_hex: hex,
            selection: document.view_selection_text(),
        }
    });

    if let Some(output) = &request.output {
        document
            .as_storable()
            .context("document cannot be exported")?
            .store_to_url(&file_url(output), &config.export_filter)
            .with_context(|| format!("failed to export {}", output.display()))?;
    }

    Ok(AnnotateOutput {
        report: annotation.report,
        collisions: table.collisions(),
        anchors,
        navigation,
    })
}

impl fmt::Display for AnnotateOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.report;
        writeln!(
            f,
            "definitions {}  references {}  collisions {}",
            r.definitions_matched, r.references_matched, self.collisions
        )?;
        writeln!(
            f,
            "paragraphs {}  words {}  tables skipped {}  unusable {}  unresolved {}  last color {}",
            r.paragraphs,
            r.words,
            r.tables_skipped,
            r.unusable_elements,
            r.unresolved_spans,
            r.last_color
        )?;
        if r.cancelled {
            writeln!(f, "cancelled")?;
        }
        for anchor in &self.anchors {
            writeln!(
                f,
                "{}  {}  {:?}",
                anchor.term_start_hex, anchor.name, anchor.text
            )?;
            for reference in &anchor.references {
                writeln!(f, "    -> {reference:?}")?;
            }
        }
        if let Some(nav) = &self.navigation {
            match &nav.selection {
                Some(text) => writeln!(f, "selected {}: {text:?}", nav.term_start_hex)?,
                None => writeln!(f, "nothing selected for {}", nav.term_start_hex)?,
            }
        }
        Ok(())
    }
}

/// Outcome of one subcommand
#[derive(Debug)]
pub enum Outcome {
    /// `colorize` finished
    Colorized(PassReport),
    /// `annotate` finished
    Annotated(AnnotateOutput, OutputFormat),
    /// `config` rendered the effective configuration
    Config(String),
}

impl Outcome {
    /// Whether the pass stopped early on cancellation
    #[must_use]
    pub fn cancelled(&self) -> bool {
        match self {
            Self::Colorized(report) | Self::Annotated(AnnotateOutput { report, .. }, _) => {
                report.cancelled
            }
            Self::Config(_) => false,
        }
    }

    /// Text printed on stdout
    ///
    /// # Errors
    /// JSON serialization failure.
    pub fn render(&self) -> Result<String> {
        Ok(match self {
            Self::Colorized(report) => format!(
                "colorized {} words in {} paragraphs, last color {}\n",
                report.words, report.paragraphs, report.last_color
            ),
            Self::Annotated(output, OutputFormat::Text) => output.to_string(),
            Self::Annotated(output, OutputFormat::Json) => {
                let mut json = serde_json::to_string_pretty(output)?;
                json.push('\n');
                json
            }
            Self::Config(toml) => toml.clone(),
        })
    }
}

/// Run one subcommand
///
/// # Errors
/// Whatever the subcommand reports, or a worker that panicked.
pub async fn run(
    action: Action,
    config: ColorlinkConfig,
    cancel: CancellationToken,
) -> Result<Outcome> {
    match action {
        Action::Colorize { input, output } => {
            let report = tokio::task::spawn_blocking(move || {
                colorize(&input, &output, &config.overlay, cancel)
            })
            .await
            .context("colorize worker failed")??;
            Ok(Outcome::Colorized(report))
        }
        Action::Annotate {
            input,
            terms,
            format,
            goto,
            output,
        } => {
            let request = AnnotateRequest {
                input,
                terms,
                goto,
                output,
            };
            let output = tokio::task::spawn_blocking(move || {
                annotate(&request, &config.overlay, cancel)
            })
            .await
            .context("annotate worker failed")??;
            Ok(Outcome::Annotated(output, format))
        }
        Action::Config => Ok(Outcome::Config(config.to_toml()?)),
    }
}
