//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use chrono::DateTime;
use fmeta_core::{FileState, ObjectRecord};
use serde::Serialize;
use std::io::{self, Write};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Write output using the configured format.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

/// Render a Unix timestamp for text output.
pub fn format_timestamp(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("@{}", ts),
    }
}

/// Render a full object record for the `show` command.
pub fn render_object_record(record: &ObjectRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("Hash: {}\n", record.hash));
    out.push_str(&format!("Size: {} bytes\n", record.size));

    out.push_str("Paths:\n");
    for (path, first_seen) in &record.paths {
        out.push_str(&format!("  {} (first seen {})\n", path, format_timestamp(*first_seen)));
    }

    if !record.tags.is_empty() {
        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        out.push_str(&format!("Tags: {}\n", tags.join(", ")));
    }

    if !record.metas.is_empty() {
        out.push_str("Metas:\n");
        for (key, value) in &record.metas {
            out.push_str(&format!("  {} = {}\n", key, value));
        }
    }

    if !record.comments.is_empty() {
        out.push_str("Comments:\n");
        for comment in record.comments_by_time() {
            out.push_str(&format!(
                "  {} [{}] {}\n",
                comment.id,
                format_timestamp(comment.timestamp),
                comment.text
            ));
        }
    }

    out
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub error: String,
}

/// Output for `init` command.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub root: String,
}

/// Output for `status` command.
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub success: bool,
    pub path: String,
    pub state: FileState,
    pub code: char,
}

/// One path handled by the `add` command.
#[derive(Debug, Clone, Serialize)]
pub struct AddedFile {
    pub path: String,
    pub state: FileState,
    pub action: &'static str,
}

/// Output for `add` command.
#[derive(Debug, Serialize)]
pub struct AddOutput {
    pub success: bool,
    pub files: Vec<AddedFile>,
}

/// Output for `comment` command.
#[derive(Debug, Serialize)]
pub struct CommentOutput {
    pub success: bool,
    pub path: String,
    pub id: String,
    pub timestamp: i64,
}

/// Output for `meta` command.
#[derive(Debug, Serialize)]
pub struct MetaOutput {
    pub success: bool,
    pub path: String,
    pub key: String,
    pub value: String,
}

/// Output for `tag` command.
#[derive(Debug, Serialize)]
pub struct TagOutput {
    pub success: bool,
    pub path: String,
    pub tag: String,
}

/// Output for `show` command.
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub success: bool,
    pub path: String,
    pub record: ObjectRecord,
}
