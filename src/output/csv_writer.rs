//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{DemuxError, Result};
use crate::message::Message;

const HEADER: [&str; 4] = ["Timestamp", "Sender", "Type", "Content"];

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `Timestamp` (UTC, `%Y-%m-%d %H:%M:%S`), `Sender`, `Type`,
///   `Content`
/// - Encoding: UTF-8
pub fn write_csv(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, messages)?;
    Ok(())
}

/// Same as [`write_csv`], but returns a String.
pub fn to_csv(messages: &[Message]) -> Result<String> {
    let bytes = write_records(Vec::new(), messages)?;
    String::from_utf8(bytes)
        .map_err(|e| DemuxError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn write_records<W: Write>(sink: W, messages: &[Message]) -> Result<W> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);
    writer.write_record(HEADER)?;

    for message in messages {
        let timestamp = message
            .datetime()
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        writer.write_record([
            timestamp.as_str(),
            message.sender.name(),
            message.kind.name(),
            message.content(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| DemuxError::Io(e.into_error()))
}
