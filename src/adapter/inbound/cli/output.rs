//! Terminal output for the CLI handlers.
//!
//! Every handler writes through this module so that `--json` and `--quiet`
//! behave the same everywhere. In JSON mode stdout carries exactly one
//! document per command (see [`report`]); warnings and errors go to stderr.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

/// Output flags taken from the global command-line options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Count of `-v` flags; only logging consumes it today.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }

    /// Whether human-readable stdout lines should be printed.
    const fn prints_text(self) -> bool {
        !self.json && !self.quiet
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputConfig> {
    OUTPUT.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn text() -> bool {
    current().prints_text()
}

/// Install the flags for this process.
pub fn configure(config: OutputConfig) {
    match cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn is_quiet() -> bool {
    current().quiet
}

pub fn header(version: &str) {
    if text() {
        println!("{} {}\n", "bundlefit".bold(), version.dimmed());
    }
}

pub fn section(title: &str) {
    if text() {
        println!("\n{}", title.bold());
    }
}

/// Print `label  value` aligned with the other fields of a section.
pub fn field(label: &str, value: impl Display) {
    if text() {
        println!("  {:<16} {}", label.dimmed(), value);
    }
}

pub fn success(message: &str) {
    if text() {
        println!("  {} {}", "✓".green(), message);
    }
}

pub fn note(message: &str) {
    if text() {
        println!("  {}", message.dimmed());
    }
}

/// Print a table built from `rows`, indented under the current section.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    if text() {
        for line in Table::new(rows).to_string().lines() {
            println!("  {line}");
        }
    }
}

/// Warn about something the command worked around.
///
/// Shown even with `--quiet`; in JSON mode it becomes a JSON line on stderr.
pub fn warning(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "warning", "message": message }));
    } else {
        println!("  {} {}", "⚠".yellow(), message);
    }
}

/// Report the error that ended the command.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "message": message }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Emit the JSON result of `command`.
///
/// `payload` must be an object; its keys are placed next to `"command"`.
pub fn report(command: &str, payload: Value) {
    let mut document = serde_json::Map::new();
    document.insert("command".into(), Value::from(command));
    if let Value::Object(fields) = payload {
        document.extend(fields);
    }
    println!("{}", Value::Object(document));
}

/// Cyan in text mode, plain otherwise.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

/// Money amount rounded to two places.
#[must_use]
pub fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// A fraction of one shown as a percentage, e.g. `0.25` as `25.00%`.
#[must_use]
pub fn percent(value: Decimal) -> String {
    format!("{:.2}%", (value * Decimal::ONE_HUNDRED).round_dp(2))
}
