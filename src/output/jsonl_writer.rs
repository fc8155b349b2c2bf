//! JSON Lines (JSONL) output writer.
//!
//! One message per line keeps large chats streamable.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::message::Message;

/// Writes messages to `output_path`, one JSON object per line.
pub fn write_jsonl(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    write_lines(&mut writer, messages)?;
    writer.flush()?;
    Ok(())
}

/// Same as [`write_jsonl`], but returns a String.
pub fn to_jsonl(messages: &[Message]) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(&mut buffer, messages)?;
    // serde_json only emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_lines(writer: &mut impl Write, messages: &[Message]) -> Result<()> {
    for message in messages {
        serde_json::to_writer(&mut *writer, message)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawEvent, build_chat};
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_jsonl_lines() {
        let chat = build_chat(
            vec![
                RawEvent::text("Alice", 0, "Hello"),
                RawEvent::new("Bob", 1),
            ],
            "Alice",
        )
        .unwrap();

        let jsonl = to_jsonl(chat.messages()).unwrap();
        let lines: Vec<_> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["content"], "Hello");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "empty");
        assert!(second.get("content").is_none());
    }

    #[test]
    fn test_write_jsonl_file() {
        let chat = build_chat(vec![RawEvent::text("Alice", 0, "Hello")], "Alice").unwrap();
        let file = NamedTempFile::new().unwrap();

        write_jsonl(chat.messages(), file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }
}
