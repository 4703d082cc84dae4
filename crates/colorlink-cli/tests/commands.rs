//! Subcommands end to end on files in a temporary directory

use colorlink_cli::commands::{self, AnnotateRequest};
use colorlink_cli::{Action, ColorlinkConfig, Outcome, OutputFormat};
use colorlink_overlay::OverlayConfig;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const DOCUMENT: &str = "The quick brown fox jumps\n| a | b |\nEvery fox runs\n";

const TERMS: &str = r#"[
  {
    "id": 2,
    "name": "fox",
    "termStartHex": "000203",
    "termEndHex": "000203",
    "references": [
      { "referenceStartHex": "000401", "referenceEndHex": "000401" }
    ]
  },
  {
    "id": 1,
    "name": "quick brown",
    "termStartHex": "000201",
    "termEndHex": "000202"
  }
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.txt"), DOCUMENT).unwrap();
        std::fs::write(dir.path().join("terms.json"), TERMS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn request(&self) -> AnnotateRequest {
        AnnotateRequest {
            input: self.path("doc.txt"),
            terms: self.path("terms.json"),
            ..AnnotateRequest::default()
        }
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn colorize_exports_word_colors() {
    let ws = Workspace::new();
    let output = ws.path("colored.json");

    let report = commands::colorize(
        &ws.path("doc.txt"),
        &output,
        &OverlayConfig::default(),
        CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(report.words, 7);
    assert_eq!(report.paragraphs, 2);
    assert_eq!(report.tables_skipped, 1);
    let export = read(&output);
    assert!(export.contains("\"000204\""), "{export}");
    assert!(export.contains("\"000402\""), "{export}");
}

#[test]
fn annotate_reports_anchors_in_color_order() {
    let ws = Workspace::new();

    let output =
        commands::annotate(&ws.request(), &OverlayConfig::default(), CancellationToken::new())
            .unwrap();

    assert_eq!(output.report.definitions_matched, 2);
    assert_eq!(output.report.references_matched, 1);
    assert_eq!(output.collisions, 0);
    let rows: Vec<_> = output
        .anchors
        .iter()
        .map(|a| (a.term_start_hex.to_string(), a.name.as_str(), a.text.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("000201".to_string(), "quick brown", "quick brown"),
            ("000203".to_string(), "fox", "fox"),
        ]
    );
    assert_eq!(output.anchors[1].references, vec!["fox".to_string()]);
    assert!(output.navigation.is_none());

    let text = output.to_string();
    assert!(text.starts_with("definitions 2  references 1  collisions 0\n"), "{text}");
    assert!(text.contains("000203  fox  \"fox\"\n    -> \"fox\"\n"), "{text}");
}

#[test]
fn annotate_selects_and_exports() {
    let ws = Workspace::new();
    let request = AnnotateRequest {
        goto: Some("000201".into()),
        output: Some(ws.path("linked.json")),
        ..ws.request()
    };

    let output =
        commands::annotate(&request, &OverlayConfig::default(), CancellationToken::new()).unwrap();

    let navigation = output.navigation.unwrap();
    assert_eq!(navigation.selection.as_deref(), Some("quick brown"));
    let export = read(&ws.path("linked.json"));
    assert!(export.contains("term://000201"), "{export}");
    assert!(export.contains("termref://000203"), "{export}");
}

#[test]
fn annotate_rejects_bad_input() {
    let ws = Workspace::new();
    let config = OverlayConfig::default();

    let bad_goto = AnnotateRequest {
        goto: Some("fox".into()),
        ..ws.request()
    };
    let err = commands::annotate(&bad_goto, &config, CancellationToken::new()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid --goto color"), "{err:#}");

    let missing_terms = AnnotateRequest {
        terms: ws.path("nope.json"),
        ..ws.request()
    };
    let err = commands::annotate(&missing_terms, &config, CancellationToken::new()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load terms"), "{err:#}");

    std::fs::write(ws.path("terms.json"), r#"[{"id":1,"name":"x","termStartHex":"zz","termEndHex":"000200"}]"#)
        .unwrap();
    assert!(commands::annotate(&ws.request(), &config, CancellationToken::new()).is_err());
}

#[test]
fn cancelled_annotate_reports_cancellation() {
    let ws = Workspace::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let output = commands::annotate(&ws.request(), &OverlayConfig::default(), cancel).unwrap();

    assert!(output.report.cancelled);
    assert!(output.anchors.is_empty());
    assert!(Outcome::Annotated(output, OutputFormat::Text).cancelled());
}

#[tokio::test]
async fn run_annotate_renders_json() {
    let ws = Workspace::new();
    let action = Action::Annotate {
        input: ws.path("doc.txt"),
        terms: ws.path("terms.json"),
        format: OutputFormat::Json,
        goto: None,
        output: None,
    };

    let outcome = commands::run(action, ColorlinkConfig::default(), CancellationToken::new())
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&outcome.render().unwrap()).unwrap();
    assert_eq!(json["report"]["definitions_matched"], 2);
    assert_eq!(json["anchors"][0]["term_start_hex"], "000201");
    assert_eq!(json["anchors"][1]["references"][0], "fox");
    assert!(json.get("navigation").is_none());
}

#[tokio::test]
async fn run_uses_configured_schemes() {
    let ws = Workspace::new();
    let config = ColorlinkConfig::from_toml("[overlay]\ndefinition_scheme = \"gloss\"").unwrap();
    let action = Action::Annotate {
        input: ws.path("doc.txt"),
        terms: ws.path("terms.json"),
        format: OutputFormat::Text,
        goto: None,
        output: Some(ws.path("linked.json")),
    };

    commands::run(action, config, CancellationToken::new()).await.unwrap();

    let export = read(&ws.path("linked.json"));
    assert!(export.contains("gloss://000201"), "{export}");
}

#[tokio::test]
async fn run_config_prints_effective_toml() {
    let outcome = commands::run(Action::Config, ColorlinkConfig::default(), CancellationToken::new())
        .await
        .unwrap();

    let text = outcome.render().unwrap();
    assert!(!outcome.cancelled());
    assert_eq!(ColorlinkConfig::from_toml(&text).unwrap(), ColorlinkConfig::default());
}
