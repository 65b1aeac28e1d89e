use clap::{ArgAction, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const BIN_NAME: &str = "mule-preview-extractor";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Fixed option schema. Help and version handling are done by [`Validator`],
/// not by clap, so that `--help` wins over malformed input.
#[derive(Parser, Debug, Default)]
#[command(name = "mule-preview-extractor")]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(color = clap::ColorChoice::Never)]
pub struct Cli {
    /// Anypoint Studio Directory
    #[arg(short = 'd', long = "anypoint-dir", value_name = "path")]
    pub anypoint_dir: Option<String>,

    /// Path where the generated output will be written to
    #[arg(short = 'o', long = "output", value_name = "path")]
    pub output: Option<String>,

    /// Verbosity level
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Print this usage text
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Action to perform
    #[arg(value_name = "action")]
    pub actions: Vec<String>,
}

impl Cli {
    /// The action named by the only positional token, if there is exactly one
    /// and it is legal.
    pub fn requested_action(&self) -> Option<ActionKind> {
        match self.actions.as_slice() {
            [single] => single.parse().ok(),
            _ => None,
        }
    }

    pub fn anypoint_dir(&self) -> Option<&str> {
        non_empty(self.anypoint_dir.as_deref())
    }

    pub fn output_dir(&self) -> Option<&str> {
        non_empty(self.output.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ApplyLightTheme,
    ExtractImages,
    ExtractWidgetTypes,
    GenerateMappings,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::ApplyLightTheme,
        ActionKind::ExtractImages,
        ActionKind::ExtractWidgetTypes,
        ActionKind::GenerateMappings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::ApplyLightTheme => "apply-light-theme",
            ActionKind::ExtractImages => "extract-images",
            ActionKind::ExtractWidgetTypes => "extract-widget-types",
            ActionKind::GenerateMappings => "generate-mappings",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ActionKind::ApplyLightTheme => "Extract images from the light theme plugin",
            ActionKind::ExtractImages => "Extract images from plugins",
            ActionKind::ExtractWidgetTypes => "Generate a list of possible widget types",
            ActionKind::GenerateMappings => "Generate mappings for a mule-preview client",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Outcome of validating one argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIntent {
    HelpRequested { text: String },
    ValidationFailed { text: String },
    ActionRequested {
        action: ActionKind,
        source_dir: PathBuf,
        output_dir: PathBuf,
    },
}

impl ParsedIntent {
    pub fn exit_code(&self) -> i32 {
        match self {
            ParsedIntent::HelpRequested { .. } => EXIT_SUCCESS,
            ParsedIntent::ValidationFailed { .. } => EXIT_FAILURE,
            ParsedIntent::ActionRequested { .. } => EXIT_SUCCESS,
        }
    }
}

/// Turns raw process arguments into a [`ParsedIntent`].
///
/// The option schema is built once in [`Validator::new`] and reused for every
/// call to [`Validator::validate`].
pub struct Validator {
    command: Command,
    usage: String,
}

impl Validator {
    pub fn new() -> Self {
        let command = Cli::command();
        let usage = usage(&render_options(&command));

        Self { command, usage }
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Validate `raw_args`, which must not include the program name.
    pub fn validate<I, T>(&self, raw_args: I) -> ParsedIntent
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = raw_args.into_iter().map(Into::into).collect();

        if requests_help(&args) {
            log::debug!("help requested");
            return ParsedIntent::HelpRequested {
                text: self.usage.clone(),
            };
        }

        let argv = std::iter::once(OsString::from(BIN_NAME)).chain(args);
        let parsed = self
            .command
            .clone()
            .try_get_matches_from(argv)
            .and_then(|matches| Cli::from_arg_matches(&matches));

        match parsed {
            Ok(cli) => self.decide(&cli),
            Err(err) => {
                log::debug!("option grammar rejected arguments: {:?}", err.kind());
                ParsedIntent::ValidationFailed {
                    text: self.grammar_failure(&err),
                }
            }
        }
    }

    fn decide(&self, cli: &Cli) -> ParsedIntent {
        if cli.help {
            return ParsedIntent::HelpRequested {
                text: self.usage.clone(),
            };
        }

        match (cli.requested_action(), cli.anypoint_dir(), cli.output_dir()) {
            (Some(action), Some(source_dir), Some(output_dir)) => ParsedIntent::ActionRequested {
                action,
                source_dir: PathBuf::from(source_dir),
                output_dir: PathBuf::from(output_dir),
            },
            _ => ParsedIntent::ValidationFailed {
                text: self.usage.clone(),
            },
        }
    }

    fn grammar_failure(&self, err: &clap::Error) -> String {
        let rendered = err.to_string();
        let detail = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ");

        format!("{}\n{}", error_message(detail), self.usage)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// `--help` anywhere before `--`, or `h` inside a short cluster before any
/// value-taking flag.
fn requests_help(args: &[OsString]) -> bool {
    for arg in args {
        let arg = arg.to_string_lossy();
        if arg == "--" {
            break;
        }
        if arg == "--help" {
            return true;
        }
        let Some(cluster) = arg.strip_prefix('-') else {
            continue;
        };
        if cluster.starts_with('-') {
            continue;
        }
        for flag in cluster.chars() {
            match flag {
                'h' => return true,
                'd' | 'o' => break,
                _ => {}
            }
        }
    }
    false
}

pub fn usage(options_summary: &str) -> String {
    let mut lines = vec![
        "This is a tool for extracting information from Mule plugins".to_string(),
        String::new(),
        format!("Usage: {} [options] action", BIN_NAME),
        String::new(),
        "Options:".to_string(),
        options_summary.to_string(),
        String::new(),
        "Actions:".to_string(),
    ];

    for action in ActionKind::ALL {
        lines.push(format!("   {:<24}{}", action.name(), action.description()));
    }
    lines.push(String::new());

    lines.join("\n")
}

pub fn error_message(detail: &str) -> String {
    format!(
        "The following errors occurred while parsing your command:\n\n{}\n",
        detail
    )
}

/// Render the non-positional arguments of `command` as an aligned table.
pub fn render_options(command: &Command) -> String {
    let rows: Vec<(String, String)> = command
        .get_arguments()
        .filter(|arg| !arg.is_positional())
        .map(|arg| {
            let mut flags = Vec::new();
            if let Some(short) = arg.get_short() {
                flags.push(format!("-{}", short));
            }
            if let Some(long) = arg.get_long() {
                flags.push(format!("--{}", long));
            }

            let mut left = flags.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "value".to_string());
                left.push_str(&format!(" <{}>", value_name));
            }

            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            (left, help)
        })
        .collect();

    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);

    rows.iter()
        .map(|(left, help)| {
            format!("  {:<width$}  {}", left, help, width = width)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
