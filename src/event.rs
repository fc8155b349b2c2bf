//! Raw export records.
//!
//! [`RawEvent`] mirrors one entry of the `messages` array in a Messenger
//! `message_N.json` file. Known keys get typed, optional fields; anything else
//! is kept verbatim in [`RawEvent::extra`] so nothing from the export is lost.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The export's `type` discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// Ordinary messages and most generated notices.
    #[default]
    Generic,
    /// A shared link or post.
    Share,
    /// People were added to the group.
    Subscribe,
    /// Someone left or was removed from the group.
    Unsubscribe,
    /// Call records.
    Call,
    /// Any other value, kept as written.
    Other(String),
}

impl EventKind {
    /// Returns the string used in the export.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Generic => "Generic",
            EventKind::Share => "Share",
            EventKind::Subscribe => "Subscribe",
            EventKind::Unsubscribe => "Unsubscribe",
            EventKind::Call => "Call",
            EventKind::Other(other) => other,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "Generic" => EventKind::Generic,
            "Share" => EventKind::Share,
            "Subscribe" => EventKind::Subscribe,
            "Unsubscribe" => EventKind::Unsubscribe,
            "Call" => EventKind::Call,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(EventKind::from(value.as_str()))
    }
}

/// A reaction as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReaction {
    pub reaction: String,
    pub actor: String,
}

/// A `{"uri": ...}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUri {
    pub uri: String,
}

/// An exported attachment. `creation_timestamp` is in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMedia {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<RawUri>,
}

/// Shared link metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawShare {
    #[serde(default, alias = "shared_link", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_text: Option<String>,
}

/// A user reference in subscribe/unsubscribe events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    pub name: String,
}

/// One unprocessed export entry.
///
/// # Example
///
/// ```rust
/// use chatdemux::event::{EventKind, RawEvent};
///
/// let event: RawEvent = serde_json::from_str(
///     r#"{"sender_name": "Ann", "timestamp_ms": 1000, "content": "Hi", "type": "Generic",
///         "is_unsent": false}"#,
/// )?;
/// assert_eq!(event.kind, EventKind::Generic);
/// assert!(event.extra.contains_key("is_unsent"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub sender_name: String,
    pub timestamp_ms: i64,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<Vec<RawReaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<RawMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gifs: Option<Vec<RawMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_files: Option<Vec<RawMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<RawMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<RawMedia>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<RawMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<RawShare>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<RawUser>>,
    /// Keys this model does not name.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawEvent {
    /// Creates a `Generic` event with no content.
    pub fn new(sender_name: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            sender_name: sender_name.into(),
            timestamp_ms,
            kind: EventKind::Generic,
            content: None,
            reactions: None,
            photos: None,
            gifs: None,
            audio_files: None,
            videos: None,
            files: None,
            sticker: None,
            share: None,
            users: None,
            extra: Map::new(),
        }
    }

    /// Creates a `Generic` text event.
    pub fn text(
        sender_name: impl Into<String>,
        timestamp_ms: i64,
        content: impl Into<String>,
    ) -> Self {
        Self::new(sender_name, timestamp_ms).with_content(content)
    }

    /// Builder method to set the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Builder method to set the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder method to set the `users` list.
    #[must_use]
    pub fn with_users<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = Some(
            names
                .into_iter()
                .map(|name| RawUser { name: name.into() })
                .collect(),
        );
        self
    }

    /// Builder method to append a reaction.
    #[must_use]
    pub fn with_reaction(mut self, reaction: impl Into<String>, actor: impl Into<String>) -> Self {
        self.reactions.get_or_insert_with(Vec::new).push(RawReaction {
            reaction: reaction.into(),
            actor: actor.into(),
        });
        self
    }

    /// Returns `true` if any attachment field is present, even if empty.
    pub fn has_attachments(&self) -> bool {
        self.photos.is_some()
            || self.gifs.is_some()
            || self.audio_files.is_some()
            || self.videos.is_some()
            || self.sticker.is_some()
            || self.files.is_some()
    }
}
