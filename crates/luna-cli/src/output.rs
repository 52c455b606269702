//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use luna_domain::{FieldSet, History};
use luna_oracle::{OracleError, Reading};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a reading.
    pub fn format_reading(&self, reading: &Reading, fields: FieldSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_reading_json(reading),
            OutputFormat::Pretty => Ok(self.format_reading_pretty(reading, fields)),
        }
    }

    fn format_reading_json(&self, reading: &Reading) -> Result<String> {
        let json = serde_json::json!({
            "question": reading.question,
            "result": reading.record,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    /// One labeled line per field, in the field set's order. Keys the model
    /// left out are shown empty.
    fn format_reading_pretty(&self, reading: &Reading, fields: FieldSet) -> String {
        let mut lines = vec![self.colorize("🔮 Luna's reading", "magenta")];
        for field in fields.fields() {
            let value = reading.record.text_or_empty(field.key);
            lines.push(format!("{} {}", self.colorize(&format!("{}:", field.label), "cyan"), value));
        }
        lines.join("\n")
    }

    /// Format a failed question.
    ///
    /// Extraction failures are followed by the raw model output so the user
    /// can see what came back.
    pub fn failure(&self, error: &OracleError) -> String {
        let mut out = self.error(&error.to_string());
        if let Some(raw) = error.raw_response() {
            out.push_str("\nReceived text:\n");
            out.push_str(raw);
        }
        out
    }

    /// Format the session's readings, newest first.
    ///
    /// The pretty table digests each reading with the field set's headline.
    pub fn format_history(&self, history: &History, fields: FieldSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = history.recent().collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Pretty => Ok(self.format_history_table(history, fields)),
        }
    }

    fn format_history_table(&self, history: &History, fields: FieldSet) -> String {
        if history.is_empty() {
            return self.colorize("No readings yet.", "yellow");
        }

        let headline = fields.headline();
        let mut builder = Builder::default();
        builder.push_record(["#", "Question", headline.label]);

        let total = history.len();
        for (i, entry) in history.recent().enumerate() {
            builder.push_record([
                (total - i).to_string(),
                entry.question.clone(),
                entry.result.text_or_empty(headline.key),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
