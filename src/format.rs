//! Output format selection.
//!
//! [`OutputFormat`] names the ways a built chat can be rendered, and
//! [`write_to_format`] / [`to_format_string`] dispatch to the matching writer
//! in [`output`](crate::output).
//!
//! # Example
//!
//! ```rust
//! use chatdemux::format::{OutputFormat, to_format_string};
//! use chatdemux::{build_chat, RawEvent};
//!
//! let chat = build_chat(vec![RawEvent::text("Ann", 0, "Hi")], "Ann")?;
//!
//! let format = OutputFormat::from_path("out.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! assert!(to_format_string(&chat, format)?.ends_with('\n'));
//! # Ok::<(), chatdemux::DemuxError>(())
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chat::Chat;
use crate::error::{DemuxError, Result};
use crate::output;

/// How a chat is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Totals per participant and message type (default)
    #[default]
    Summary,

    /// Pretty JSON array of messages
    Json,

    /// One JSON message per line
    #[cfg_attr(feature = "cli", value(alias = "ndjson"))]
    Jsonl,

    /// `;`-delimited table of timestamp, sender, type and content
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Summary => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Summary,
            OutputFormat::Json,
            OutputFormat::Jsonl,
            OutputFormat::Csv,
        ]
    }

    /// Detects format from a file path based on extension.
    ///
    /// ```rust
    /// use chatdemux::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("chat.CSV").unwrap(), OutputFormat::Csv);
    /// assert!(OutputFormat::from_path("chat.xml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(DemuxError::unknown_format(format!(".{ext}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "Summary"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DemuxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(DemuxError::unknown_format(s)),
        }
    }
}

#[cfg(not(feature = "csv-output"))]
fn csv_disabled() -> DemuxError {
    DemuxError::UnknownFormat {
        input: "csv".into(),
        expected: "summary, json, jsonl (csv requires the 'csv-output' feature)",
    }
}

/// Renders `chat` in `format` and writes it to `path`.
pub fn write_to_format(chat: &Chat, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            std::fs::write(path, output::to_summary(chat))?;
            Ok(())
        }
        OutputFormat::Json => output::write_json(chat.messages(), path),
        OutputFormat::Jsonl => output::write_jsonl(chat.messages(), path),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::write_csv(chat.messages(), path),
        #[cfg(not(feature = "csv-output"))]
        OutputFormat::Csv => Err(csv_disabled()),
    }
}

/// Renders `chat` in `format`.
pub fn to_format_string(chat: &Chat, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Summary => Ok(output::to_summary(chat)),
        OutputFormat::Json => output::to_json(chat.messages()),
        OutputFormat::Jsonl => output::to_jsonl(chat.messages()),
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => output::to_csv(chat.messages()),
        #[cfg(not(feature = "csv-output"))]
        OutputFormat::Csv => Err(csv_disabled()),
    }
}
