//! Sources of raw events.
//!
//! A [`ChatFeed`] hands the builder every event of one conversation, oldest
//! first. Messenger's "Download Your Information" export writes a
//! conversation as one or more `message_<N>.json` files in a folder, each
//! holding its slice of the history newest first:
//!
//! ```json
//! {
//!   "participants": [{"name": "Ann"}, {"name": "Bob"}],
//!   "messages": [
//!     {"sender_name": "Bob", "timestamp_ms": 2000, "content": "Hey", "type": "Generic"},
//!     {"sender_name": "Ann", "timestamp_ms": 1000, "content": "Hi", "type": "Generic"}
//!   ]
//! }
//! ```
//!
//! [`ChatFileFeed`] reads one such file and [`ChatFolderFeed`] a whole folder.
//! Any `Vec<RawEvent>` already in order is a feed too.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::{DemuxError, Result};
use crate::event::RawEvent;

/// A conversation's events, oldest first.
///
/// Feeds are consumed by value and yield each event exactly once.
pub trait ChatFeed {
    /// Iterator over the events.
    type Events: Iterator<Item = RawEvent>;

    /// Consumes the feed.
    fn into_events(self) -> Self::Events;
}

impl ChatFeed for Vec<RawEvent> {
    type Events = std::vec::IntoIter<RawEvent>;

    fn into_events(self) -> Self::Events {
        self.into_iter()
    }
}

/// Repairs Meta's double encoding.
///
/// The export writes each UTF-8 byte of a string as its own code point in
/// U+0000..=U+00FF, so "Château" arrives as "ChÃ¢teau". Taking each char as a
/// byte and decoding the result recovers the original. Strings that contain a
/// code point above U+00FF, or whose bytes are not valid UTF-8, were never
/// double-encoded and are returned unchanged.
///
/// ```rust
/// use chatdemux::feed::fix_mojibake_encoding;
///
/// assert_eq!(fix_mojibake_encoding("Ch\u{c3}\u{a2}teau"), "Château");
/// assert_eq!(fix_mojibake_encoding("Hello"), "Hello");
/// assert_eq!(fix_mojibake_encoding("Château"), "Château");
/// assert_eq!(fix_mojibake_encoding("🍺"), "🍺");
/// ```
pub fn fix_mojibake_encoding(s: &str) -> String {
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(c).ok()).collect();
    bytes
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| s.to_string())
}

/// Applies [`fix_mojibake_encoding`] to every string key and value.
fn fix_value_encoding(value: &mut Value) {
    match value {
        Value::String(s) => *s = fix_mojibake_encoding(s),
        Value::Array(items) => items.iter_mut().for_each(fix_value_encoding),
        Value::Object(map) => {
            let entries = std::mem::take(map);
            for (key, mut item) in entries {
                fix_value_encoding(&mut item);
                map.insert(fix_mojibake_encoding(&key), item);
            }
        }
        _ => {}
    }
}

#[derive(Deserialize)]
struct ExportFile {
    messages: Vec<RawEvent>,
}

/// Events from a single export file.
///
/// # Example
///
/// ```rust,no_run
/// use chatdemux::build_chat;
/// use chatdemux::feed::ChatFileFeed;
///
/// let feed = ChatFileFeed::open("inbox/hikers_abc123/message_1.json")?;
/// let chat = build_chat(feed, "Ann Example")?;
/// println!("{} messages", chat.messages().len());
/// # Ok::<(), chatdemux::DemuxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChatFileFeed {
    events: Vec<RawEvent>,
}

impl ChatFileFeed {
    /// Reads `path` with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &FeedConfig::default())
    }

    /// Reads `path`.
    ///
    /// Fails with [`DemuxError::InvalidFeed`] if the file cannot be read or is
    /// not an export.
    pub fn open_with_config(path: impl AsRef<Path>, config: &FeedConfig) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        let feed = Self::parse(&content, config).map_err(|e| read_error(path, e))?;
        debug!(path = %path.display(), events = feed.len(), "loaded export file");
        Ok(feed)
    }

    /// Parses the contents of an export file.
    pub fn from_json_str(json: &str, config: &FeedConfig) -> Result<Self> {
        Ok(Self::parse(json, config)?)
    }

    fn parse(json: &str, config: &FeedConfig) -> serde_json::Result<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        if config.fix_encoding {
            fix_value_encoding(&mut value);
        }
        let export: ExportFile = serde_json::from_value(value)?;

        let mut events = export.messages;
        events.reverse();
        Ok(Self { events })
    }

    /// Number of events in the file.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn read_error(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> DemuxError {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    DemuxError::invalid_feed_from(
        format!("Could not read json stream from file: {name}"),
        Some(path.to_path_buf()),
        source,
    )
}

impl ChatFeed for ChatFileFeed {
    type Events = std::vec::IntoIter<RawEvent>;

    fn into_events(self) -> Self::Events {
        self.events.into_iter()
    }
}

static PART_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^message_(\d+)\.json$").expect("valid part file pattern"));

/// Returns `N` for a file named `message_<N>.json`.
fn part_number(file_name: &str) -> Option<u64> {
    PART_FILE.captures(file_name)?.get(1)?.as_str().parse().ok()
}

/// Events from a folder of `message_1.json`, `message_2.json`, ... files.
///
/// Higher-numbered files hold older history, so files are read in descending
/// numeric order. Sub-folders (the export puts `photos/`, `videos/` and so on
/// next to the JSON) are ignored.
#[derive(Debug, Clone)]
pub struct ChatFolderFeed {
    files: Vec<ChatFileFeed>,
}

impl ChatFolderFeed {
    /// Reads every part file in `folder` with the default configuration.
    pub fn open(folder: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(folder, &FeedConfig::default())
    }

    /// Reads every part file in `folder`.
    ///
    /// Fails if `folder` is not a directory, holds no files, or holds a file
    /// not named `message_<NUM>.json`, and on any error reading a part.
    pub fn open_with_config(folder: impl AsRef<Path>, config: &FeedConfig) -> Result<Self> {
        let folder = folder.as_ref();
        if !folder.is_dir() {
            return Err(DemuxError::invalid_feed(
                "Could not create folder feed; not a folder",
                folder,
            ));
        }

        let mut parts: Vec<(u64, PathBuf)> = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_dir() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some(number) = part_number(&name) else {
                return Err(DemuxError::invalid_feed(
                    format!(
                        "Chat folder contains the file '{name}', which does not fit expected message_NUM.json format"
                    ),
                    folder,
                ));
            };
            parts.push((number, path));
        }

        if parts.is_empty() {
            return Err(DemuxError::invalid_feed(
                "Could not create feed from empty folder",
                folder,
            ));
        }

        parts.sort_by(|a, b| b.0.cmp(&a.0));
        let files = parts
            .into_iter()
            .map(|(_, path)| ChatFileFeed::open_with_config(path, config))
            .collect::<Result<Vec<_>>>()?;

        debug!(folder = %folder.display(), files = files.len(), "loaded export folder");
        Ok(Self { files })
    }

    /// Number of part files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl ChatFeed for ChatFolderFeed {
    type Events = std::iter::Flatten<std::vec::IntoIter<ChatFileFeed>>;

    fn into_events(self) -> Self::Events {
        self.files.into_iter().flatten()
    }
}

impl IntoIterator for ChatFileFeed {
    type Item = RawEvent;
    type IntoIter = std::vec::IntoIter<RawEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// Opens `path` as a folder feed if it is a directory, otherwise as a file.
pub fn open_path(path: impl AsRef<Path>, config: &FeedConfig) -> Result<BoxedFeed> {
    let path = path.as_ref();
    if path.is_dir() {
        let feed = ChatFolderFeed::open_with_config(path, config)?;
        Ok(Box::new(feed.into_events()))
    } else {
        let feed = ChatFileFeed::open_with_config(path, config)?;
        Ok(Box::new(feed.into_events()))
    }
}

/// A type-erased feed, as returned by [`open_path`].
pub type BoxedFeed = Box<dyn Iterator<Item = RawEvent>>;

impl ChatFeed for BoxedFeed {
    type Events = Self;

    fn into_events(self) -> Self::Events {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fix_mojibake() {
        assert_eq!(
            fix_mojibake_encoding("d\u{e2}\u{80}\u{99}If"),
            "d\u{2019}If"
        );
        assert_eq!(fix_mojibake_encoding("\u{f0}\u{9f}\u{8d}\u{ba}"), "🍺");
        assert_eq!(fix_mojibake_encoding(""), "");
    }

    #[test]
    fn test_fix_mojibake_invalid_utf8_unchanged() {
        // A lone Latin-1 "é" is not a valid UTF-8 sequence.
        assert_eq!(fix_mojibake_encoding("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_fix_value_encoding_recurses() {
        let mut value = json!({
            "a\u{c3}\u{a9}": ["Ch\u{c3}\u{a2}teau", {"k": "\u{c3}\u{a9}"}],
            "n": 3
        });
        fix_value_encoding(&mut value);
        assert_eq!(value["aé"][0], "Château");
        assert_eq!(value["aé"][1]["k"], "é");
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn test_from_json_str_reverses() {
        let json = r#"{"participants": [], "messages": [
            {"sender_name": "B", "timestamp_ms": 2, "content": "second"},
            {"sender_name": "A", "timestamp_ms": 1, "content": "first"}
        ]}"#;
        let feed = ChatFileFeed::from_json_str(json, &FeedConfig::default()).unwrap();
        let events: Vec<_> = feed.into_events().collect();
        assert_eq!(events[0].content.as_deref(), Some("first"));
        assert_eq!(events[1].timestamp_ms, 2);
    }

    #[test]
    fn test_from_json_str_fix_encoding_toggle() {
        let json = r#"{"messages": [{"sender_name": "RenÃ©", "timestamp_ms": 0}]}"#;
        let fixed = ChatFileFeed::from_json_str(json, &FeedConfig::new()).unwrap();
        assert_eq!(fixed.into_events().next().unwrap().sender_name, "René");

        let raw =
            ChatFileFeed::from_json_str(json, &FeedConfig::new().with_fix_encoding(false)).unwrap();
        assert_eq!(raw.into_events().next().unwrap().sender_name, "Ren\u{c3}\u{a9}");
    }

    #[test]
    fn test_from_json_str_rejects_non_export() {
        let err = ChatFileFeed::from_json_str(r#"{"foo": 1}"#, &FeedConfig::default()).unwrap_err();
        assert!(matches!(err, DemuxError::Json(_)));
    }

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("message_1.json"), Some(1));
        assert_eq!(part_number("message_12.json"), Some(12));
        assert_eq!(part_number("message_.json"), None);
        assert_eq!(part_number("message_1.json.bak"), None);
        assert_eq!(part_number("notes.txt"), None);
    }

    #[test]
    fn test_vec_is_a_feed() {
        let feed = vec![RawEvent::text("A", 0, "x"), RawEvent::text("B", 1, "y")];
        assert_eq!(feed.into_events().count(), 2);
    }
}
