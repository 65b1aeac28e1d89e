use crate::error::{ExtractorError, UserFriendlyError};
use crate::extractor::ActionSummary;
use console::{style, Emoji, Term};
use std::time::Duration;

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Status lines for the user. Regular output goes to stdout, errors to stderr.
pub struct OutputFormatter {
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn for_terminal() -> Self {
        Self::new(Term::stdout().features().colors_supported())
    }

    pub fn success(&self, message: &str) {
        self.print_message(MessageType::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.print_message(MessageType::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.print_message(MessageType::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.print_message(MessageType::Info, message);
    }

    pub fn start_operation(&self, operation: &str) {
        if self.use_colors {
            println!("{}{}", ROCKET, style(operation).bold());
        } else {
            println!("> {}", operation);
        }
    }

    pub fn print_user_friendly_error(&self, error: &ExtractorError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            if self.use_colors {
                eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
            } else {
                eprintln!("Suggestion: {}", suggestion);
            }
        }
    }

    pub fn print_action_summary(&self, summary: &ActionSummary) {
        for line in summary_lines(summary) {
            println!("  {}", line);
        }

        for output in &summary.outputs {
            self.info(&format!("Wrote {}", output.display()));
        }

        if summary.is_clean() {
            self.success(&format!("{} completed", summary.action));
        } else {
            for error in &summary.errors {
                self.warning(error);
            }
            self.warning(&format!(
                "{} completed with {} issue(s)",
                summary.action,
                summary.errors.len()
            ));
        }
    }

    fn print_message(&self, msg_type: MessageType, message: &str) {
        let (emoji, prefix) = match msg_type {
            MessageType::Success => (&CHECKMARK, "✓"),
            MessageType::Error => (&CROSS, "✗"),
            MessageType::Warning => (&WARNING, "!"),
            MessageType::Info => (&INFO, "i"),
        };

        let line = if self.use_colors {
            let styled = match msg_type {
                MessageType::Success => style(message).green().bold(),
                MessageType::Error => style(message).red().bold(),
                MessageType::Warning => style(message).yellow().bold(),
                MessageType::Info => style(message).cyan(),
            };
            format!("{}{}", emoji, styled)
        } else {
            format!("{} {}", prefix, message)
        };

        match msg_type {
            MessageType::Error | MessageType::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn summary_lines(summary: &ActionSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Plugins scanned: {}", summary.plugins_scanned),
        format!("Files written:   {}", summary.files_written),
        format!("Bytes written:   {}", format_bytes(summary.bytes_written)),
    ];

    if summary.replaced_files > 0 {
        lines.push(format!("Files replaced:  {}", summary.replaced_files));
    }
    if summary.skipped_archives > 0 {
        lines.push(format!("Archives skipped: {}", summary.skipped_archives));
    }
    lines.push(format!("Time taken:      {}", format_duration(summary.elapsed())));

    lines
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
