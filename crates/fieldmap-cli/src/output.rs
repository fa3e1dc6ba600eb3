//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with support for
//! mapping plans, record descriptions and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use fieldmap_core::{MappingPlan, RecordSpec};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a resolved mapping plan
    fn format_plan(&self, plan: &MappingPlan) -> Result<String>;

    /// Format record declarations
    fn format_records(&self, records: &[&RecordSpec]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_plan(&self, plan: &MappingPlan) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_plan_human(plan)),
            _ => self.format(plan),
        }
    }

    fn format_records(&self, records: &[&RecordSpec]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_records_human(records)),
            _ => self.format(&records),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Disable progress indicators, e.g. when the configuration turns them off
    pub fn hide_progress(&mut self) {
        self.show_progress = false;
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        // Only a redacted copy reaches the log
        let value_json = serde_json::to_value(value)?;
        trace!(
            "Outputting data: {}",
            serde_json::to_string(&redaction::redacted(&value_json))
                .unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    /// Write a mapping plan; the human form is a table of steps
    pub fn plan(&mut self, plan: &MappingPlan) -> Result<()> {
        if self.quiet && self.format == OutputFormat::Human {
            return Ok(());
        }
        let formatted = self.format.format_plan(plan)?;
        self.emit(&formatted)
    }

    /// Write record declarations; the human form is one table per record
    pub fn records(&mut self, records: &[&RecordSpec]) -> Result<()> {
        let formatted = self.format.format_records(records)?;
        self.emit(&formatted)
    }

    /// YAML and the human tables already end with a newline
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

const PLAN_HEADERS: [&str; 5] = ["Source", "Type", "Bridge", "Target", "Type"];
const FIELD_HEADERS: [&str; 5] = ["Field", "Type", "Access", "From", "Default"];

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

fn plan_rows(plan: &MappingPlan) -> Vec<Vec<String>> {
    plan.steps
        .iter()
        .map(|step| {
            vec![
                step.source_field.clone(),
                step.source_type.clone(),
                step.bridge.to_string(),
                step.target_field.clone(),
                step.target_type.clone(),
            ]
        })
        .collect()
}

fn field_rows(record: &RecordSpec) -> Vec<Vec<String>> {
    record
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.type_name.clone(),
                field.access.to_string(),
                field.from.clone().unwrap_or_else(|| "-".to_string()),
                field
                    .default
                    .as_ref()
                    .map(format_value_compact)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }
    widths
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .enumerate()
        .map(|(i, cell)| match widths.get(i) {
            Some(width) => format!("{:width$}", cell, width = width),
            None => cell.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" │ ")
}

fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─")
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = column_widths(headers, rows);
    let mut output = String::new();
    output.push_str(&pad_row(headers.iter().copied(), &widths));
    output.push('\n');
    output.push_str(&separator(&widths));
    output.push('\n');
    for row in rows {
        output.push_str(&pad_row(row.iter().map(String::as_str), &widths));
        output.push('\n');
    }
    output
}

/// Format a mapping plan for human reading
fn format_plan_human(plan: &MappingPlan) -> String {
    let mut output = format!(
        "═══ {} → {} ({}) ═══\n\n",
        plan.source_type, plan.target_type, plan.direction
    );

    if plan.is_empty() {
        output.push_str("No correspondences declared; nothing will be copied\n");
        return output;
    }

    output.push_str(&render_table(&PLAN_HEADERS, &plan_rows(plan)));
    output.push_str(&format!("\n{} field(s) mapped\n", plan.len()));
    output
}

/// Format record declarations for human reading
fn format_records_human(records: &[&RecordSpec]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!("═══ {} ═══\n", record.name));
        if let Some(description) = &record.description {
            output.push_str(description);
            output.push('\n');
        }
        output.push_str(&render_table(&FIELD_HEADERS, &field_rows(record)));
        output.push('\n');
    }

    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
