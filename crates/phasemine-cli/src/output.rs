//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use phasemine_cleaner::CleanSummary;
use phasemine_extractor::BatchSummary;
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

    /// Format the outcome of a cleaning run.
    pub fn format_clean_summary(&self, summary: &CleanSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let files: Vec<serde_json::Value> = summary
                    .cleaned
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "file": f.file_name,
                            "bytes_in": f.bytes_in,
                            "bytes_out": f.bytes_out,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "cleaned": files,
                    "skipped": summary.skipped,
                }))?)
            }
            OutputFormat::Table => {
                if summary.cleaned.is_empty() {
                    return Ok(self.colorize("No documents cleaned.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["File", "Bytes in", "Bytes out", "Kept"]);
                for file in &summary.cleaned {
                    builder.push_record([
                        file.file_name.clone(),
                        file.bytes_in.to_string(),
                        file.bytes_out.to_string(),
                        percent(file.bytes_out, file.bytes_in),
                    ]);
                }

                let mut out = self.table(builder);
                if !summary.skipped.is_empty() {
                    out.push('\n');
                    out.push_str(&self.warning(&format!("Skipped: {}", summary.skipped.join(", "))));
                }
                Ok(out)
            }
        }
    }

    /// Format the outcome of an extraction run.
    pub fn format_batch_summary(&self, summary: &BatchSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "results_dir": summary.results_dir.display().to_string(),
                "documents": summary.documents,
                "skipped": summary.skipped,
                "records_written": summary.records_written(),
            }))?),
            OutputFormat::Table => {
                if summary.documents.is_empty() {
                    return Ok(self.colorize("No documents processed.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Document", "Chunks", "Records", "Unique", "Empty", "Failed"]);
                for doc in &summary.documents {
                    builder.push_record([
                        doc.id.clone(),
                        doc.chunks.to_string(),
                        doc.raw_records.to_string(),
                        doc.unique_records.to_string(),
                        doc.empty_chunks.to_string(),
                        doc.failed_chunks.to_string(),
                    ]);
                }

                let mut out = self.table(builder);
                out.push('\n');
                out.push_str(&self.success(&format!(
                    "{} record(s) written to {}",
                    summary.records_written(),
                    summary.results_dir.display()
                )));
                if !summary.skipped.is_empty() {
                    out.push('\n');
                    out.push_str(&self.warning(&format!("Skipped: {}", summary.skipped.join(", "))));
                }
                Ok(out)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "-".to_string();
    }
    format!("{:.0}%", part as f64 * 100.0 / whole as f64)
}
