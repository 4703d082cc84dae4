//! Command line definition

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Report format of `annotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON document
    Json,
}

/// Parsed subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Give every word its color and export the document
    Colorize {
        /// Markup input
        input: PathBuf,
        /// Export destination
        output: PathBuf,
    },
    /// Link terms into the document
    Annotate {
        /// Markup input
        input: PathBuf,
        /// Term file
        terms: PathBuf,
        /// Report format
        format: OutputFormat,
        /// Definition to select after linking
        goto: Option<String>,
        /// Export destination of the linked document
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `--config`
    pub config: Option<PathBuf>,
    /// `--json-logs`
    pub json_logs: bool,
    /// Subcommand
    pub action: Action,
}

/// The `colorlink` command
#[must_use]
pub fn command() -> Command {
    Command::new("colorlink")
        .version(crate::VERSION)
        .about("Color-channel term linking for word-cursor documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON lines"),
        )
        .subcommand(
            Command::new("colorize")
                .about("Color every word with its counter value and export the document")
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the colorized export"),
                ),
        )
        .subcommand(
            Command::new("annotate")
                .about("Turn term definitions and references into hyperlink anchors")
                .arg(input_arg())
                .arg(
                    Arg::new("terms")
                        .long("terms")
                        .short('t')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Term file (JSON array of definitions)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("text")
                        .value_parser(["text", "json"])
                        .help("Report format"),
                )
                .arg(
                    Arg::new("goto")
                        .long("goto")
                        .value_name("HEX")
                        .help("Select the definition starting at this color afterwards"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Export the linked document here"),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

fn input_arg() -> Arg {
    Arg::new("input")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Document markup: one paragraph per line, `|` rows form tables")
}

/// Parse `args`, the first item being the program name
///
/// # Errors
/// Usage errors, `--help` and `--version` as reported by clap.
pub fn parse_from<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok(Invocation::from_matches(&matches))
}

impl Invocation {
    fn from_matches(matches: &ArgMatches) -> Self {
        let action = match matches.subcommand() {
            Some(("colorize", args)) => Action::Colorize {
                input: path(args, "input"),
                output: path(args, "output"),
            },
            Some(("annotate", args)) => Action::Annotate {
                input: path(args, "input"),
                terms: path(args, "terms"),
                format: match args.get_one::<String>("format").map(String::as_str) {
                    Some("json") => OutputFormat::Json,
                    _ => OutputFormat::Text,
                },
                goto: args.get_one::<String>("goto").cloned(),
                output: args.get_one::<PathBuf>("output").cloned(),
            },
            _ => Action::Config,
        };

        Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            json_logs: matches.get_flag("json-logs"),
            action,
        }
    }
}

// Only called for arguments clap already enforced as required
fn path(args: &ArgMatches, id: &str) -> PathBuf {
    args.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn colorize_requires_output() {
        assert!(parse_from(["colorlink", "colorize", "doc.txt"]).is_err());

        let invocation = parse_from(["colorlink", "colorize", "doc.txt", "-o", "out.json"]).unwrap();
        assert_eq!(
            invocation.action,
            Action::Colorize {
                input: "doc.txt".into(),
                output: "out.json".into(),
            }
        );
        assert!(!invocation.json_logs);
    }

    #[test]
    fn annotate_with_all_options() {
        let invocation = parse_from([
            "colorlink",
            "annotate",
            "doc.txt",
            "--terms",
            "terms.json",
            "--format",
            "json",
            "--goto",
            "000201",
            "--config",
            "colorlink.toml",
            "--json-logs",
        ])
        .unwrap();

        assert_eq!(invocation.config, Some(PathBuf::from("colorlink.toml")));
        assert!(invocation.json_logs);
        assert_eq!(
            invocation.action,
            Action::Annotate {
                input: "doc.txt".into(),
                terms: "terms.json".into(),
                format: OutputFormat::Json,
                goto: Some("000201".into()),
                output: None,
            }
        );
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(parse_from([
            "colorlink", "annotate", "doc.txt", "--terms", "t.json", "--format", "yaml"
        ])
        .is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(parse_from(["colorlink"]).is_err());
        assert_eq!(parse_from(["colorlink", "config"]).unwrap().action, Action::Config);
    }
}
