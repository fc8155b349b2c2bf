//! Attachment descriptors carried by [`MessageKind::Media`](crate::message::MessageKind::Media).
//!
//! The export stores creation times in seconds; descriptors store milliseconds
//! to line up with message timestamps.

use serde::Serialize;

use crate::event::{RawEvent, RawMedia};

fn seconds_to_ms(seconds: Option<i64>) -> Option<i64> {
    seconds.map(|s| s.saturating_mul(1000))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    pub uri: String,
    pub creation_timestamp_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gif {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sticker {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioFile {
    pub uri: String,
    pub creation_timestamp_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub uri: String,
    pub thumbnail_uri: Option<String>,
    pub creation_timestamp_ms: Option<i64>,
}

/// A generic file attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentFile {
    pub uri: String,
    pub creation_timestamp_ms: Option<i64>,
}

impl From<&RawMedia> for Photo {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
            creation_timestamp_ms: seconds_to_ms(raw.creation_timestamp),
        }
    }
}

impl From<&RawMedia> for Gif {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
        }
    }
}

impl From<&RawMedia> for Sticker {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
        }
    }
}

impl From<&RawMedia> for AudioFile {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
            creation_timestamp_ms: seconds_to_ms(raw.creation_timestamp),
        }
    }
}

impl From<&RawMedia> for Video {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
            thumbnail_uri: raw.thumbnail.as_ref().map(|t| t.uri.clone()),
            creation_timestamp_ms: seconds_to_ms(raw.creation_timestamp),
        }
    }
}

impl From<&RawMedia> for AttachmentFile {
    fn from(raw: &RawMedia) -> Self {
        Self {
            uri: raw.uri.clone(),
            creation_timestamp_ms: seconds_to_ms(raw.creation_timestamp),
        }
    }
}

/// Every attachment of one message, grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachments {
    pub photos: Vec<Photo>,
    pub gifs: Vec<Gif>,
    pub audio_files: Vec<AudioFile>,
    pub videos: Vec<Video>,
    pub stickers: Vec<Sticker>,
    pub files: Vec<AttachmentFile>,
}

fn convert<'a, T: From<&'a RawMedia>>(raw: Option<&'a Vec<RawMedia>>) -> Vec<T> {
    raw.map(|items| items.iter().map(T::from).collect())
        .unwrap_or_default()
}

impl Attachments {
    /// Collects the attachments of a raw event.
    pub fn from_event(event: &RawEvent) -> Self {
        Self {
            photos: convert(event.photos.as_ref()),
            gifs: convert(event.gifs.as_ref()),
            audio_files: convert(event.audio_files.as_ref()),
            videos: convert(event.videos.as_ref()),
            stickers: event.sticker.iter().map(Sticker::from).collect(),
            files: convert(event.files.as_ref()),
        }
    }

    /// Total number of attachments.
    pub fn len(&self) -> usize {
        self.photos.len()
            + self.gifs.len()
            + self.audio_files.len()
            + self.videos.len()
            + self.stickers.len()
            + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
