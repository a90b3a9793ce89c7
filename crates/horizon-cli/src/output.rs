//! Output formatting for the horizon CLI (table, json)

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use horizon_core::{ModeBanner, Tone};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }

    /// Parse a config-file value, falling back to table
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Paint `text` in the colour of `tone`
pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Muted => text.dimmed(),
        Tone::Info => text.cyan(),
        Tone::Positive => text.green(),
        Tone::Caution => text.yellow(),
        Tone::Warning => text.bright_yellow().bold(),
        Tone::Danger => text.red().bold(),
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool, verbose: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self {
            format,
            quiet,
            verbose,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Page heading with the session mode banner
    pub fn heading(&self, title: &str, banner: &ModeBanner) {
        if self.quiet || self.is_json() {
            return;
        }
        println!(
            "{}  {} {}",
            title.bold(),
            paint(&format!("[{}]", banner.label), banner.tone),
            banner.description.dimmed()
        );
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
            OutputFormat::Json => self.print_json(&data),
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                self.print_json(&map);
            }
        }
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, data: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".to_string())
        );
    }
}

// =============================================================================
// Display types for various commands
// =============================================================================

/// Row for the fleet command
#[derive(Debug, Tabled, Serialize)]
pub struct MachineRow {
    #[tabled(rename = "Machine")]
    pub machine_id: String,
    #[tabled(rename = "Health")]
    pub health: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Last Alert")]
    pub last_alert: String,
}

/// Row for the telemetry command
#[derive(Debug, Tabled, Serialize)]
pub struct ReadingRow {
    #[tabled(rename = "Time")]
    pub timestamp: String,
    #[tabled(rename = "Vib RMS")]
    pub vibration_rms: String,
    #[tabled(rename = "Kurtosis")]
    pub kurtosis: String,
    #[tabled(rename = "Temp")]
    pub temperature: String,
    #[tabled(rename = "Power")]
    pub power: String,
    #[tabled(rename = "Anomaly")]
    pub anomaly: String,
}

/// Row for the metric strip
#[derive(Debug, Tabled, Serialize)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Trend")]
    pub trend: String,
    #[tabled(rename = "Note")]
    pub note: String,
}

/// Row for the logs command
#[derive(Debug, Tabled, Serialize)]
pub struct LogRow {
    #[tabled(rename = "Time")]
    pub timestamp: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

/// Row for the security command
#[derive(Debug, Tabled, Serialize)]
pub struct SecurityEventRow {
    #[tabled(rename = "Time")]
    pub timestamp: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "Resolved")]
    pub resolved: String,
}

/// Row for the parameters command
#[derive(Debug, Tabled, Serialize)]
pub struct ParameterRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[tabled(rename = "Allowed")]
    pub allowed: String,
}
