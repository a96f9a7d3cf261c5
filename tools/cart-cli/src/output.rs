//! Output formatting for the CLI.

use cart_commerce::money::display_amount;
use console::{style, StyledObject, Term};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    fn status(&self, badge: StyledObject<&str>, msg: &str) {
        if self.json {
            return;
        }
        let _ = self.term.write_line(&format!("{} {}", badge, msg));
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        self.status(style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        self.status(style("✓").green(), msg);
    }

    /// Print a warning to stderr.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        let _ = Term::stderr().write_line(&format!("{} {}", style("⚠").yellow(), msg));
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!(r#"{{"error": "{}"}}"#, msg.replace('"', "\\\""));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&style(msg).bold().underlined().to_string());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        let _ = self
            .term
            .write_line(&format!("  {}: {}", style(key).dim(), value));
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        let line = format!("  {}", formatted.join("  "));
        let _ = self.term.write_line(line.trim_end());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Format an amount for display (e.g., "$12.50").
pub fn format_amount(amount: f64) -> String {
    format!("${}", display_amount(amount))
}
