//! JSON output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::message::Message;

/// Writes messages to `output_path` as a pretty-printed JSON array.
pub fn write_json(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, messages)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Same as [`write_json`], but returns a String.
pub fn to_json(messages: &[Message]) -> Result<String> {
    Ok(serde_json::to_string_pretty(messages)?)
}
