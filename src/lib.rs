//! # Chatdemux
//!
//! A Rust library for turning Messenger JSON exports into strongly-typed
//! messages.
//!
//! ## Overview
//!
//! The export flattens everything that happens in a conversation into one
//! shape: a sender, a timestamp and a line of text. Calls, nickname changes,
//! polls, plans, admin changes and game scores are all just sentences like
//! "Ann started a video chat." Chatdemux runs each entry through an ordered set
//! of rules and gives back a [`Message`] whose [`MessageKind`] says what the
//! entry actually was, with participants resolved to shared identities.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatdemux::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let feed = ChatFolderFeed::open("inbox/hikers_abc123")?;
//!     let chat = build_chat(feed, "Ann Example")?;
//!
//!     for message in chat.messages() {
//!         if let MessageKind::NicknameChange { new_nickname, subject, .. } = &message.kind {
//!             println!("{} is now {:?}", subject, new_nickname);
//!         }
//!     }
//!
//!     write_jsonl(chat.messages(), "hikers.jsonl")?;
//!     Ok(())
//! }
//! ```
//!
//! ## In-memory events
//!
//! Any `Vec<RawEvent>` in chronological order is a feed:
//!
//! ```rust
//! use chatdemux::{build_chat, RawEvent};
//! use chatdemux::message::{CallType, MessageKind};
//!
//! let feed = vec![
//!     RawEvent::text("Ann", 0, "Ann started a video chat."),
//!     RawEvent::text("Bob", 1, "Bob joined the video chat."),
//!     RawEvent::text("Ann", 2, "The video chat ended."),
//! ];
//! let chat = build_chat(feed, "Ann")?;
//!
//! assert_eq!(
//!     chat.messages()[2].kind,
//!     MessageKind::CallEnd { call_type: CallType::Video }
//! );
//! # Ok::<(), chatdemux::DemuxError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`feed`] — reading exports ([`ChatFileFeed`](feed::ChatFileFeed),
//!   [`ChatFolderFeed`](feed::ChatFolderFeed))
//! - [`event`] — [`RawEvent`], one export entry
//! - [`chat`] — [`build_chat`], [`ChatBuilder`](chat::ChatBuilder), [`Chat`]
//! - [`rules`] — classification rules and dispatch
//! - [`tokens`] — the pattern engine rules are written in
//! - [`message`], [`media`], [`participant`] — the output model
//! - [`output`], [`format`] — JSON, JSONL, CSV and summary writers
//! - [`config`], [`progress`], [`error`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod format;
pub mod media;
pub mod message;
pub mod output;
pub mod participant;
pub mod progress;
pub mod rules;
pub mod state;
pub mod tokens;

// Re-export the main types at the crate root for convenience
pub use chat::{Chat, build_chat};
pub use error::{DemuxError, PatternError, Result};
pub use event::RawEvent;
pub use message::{Message, MessageKind};
pub use participant::Participant;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatdemux::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Message, MessageKind, Participant, RawEvent};

    pub use crate::error::{DemuxError, PatternError, Result};

    pub use crate::chat::{Chat, ChatBuilder, build_chat};
    pub use crate::config::{BuildConfig, FeedConfig};
    pub use crate::feed::{ChatFeed, ChatFileFeed, ChatFolderFeed};

    pub use crate::message::{CallType, ChatSetting, ChatSettingsType, Reaction};

    pub use crate::progress::{IntervalProgressReporter, ProgressReporter};

    pub use crate::format::OutputFormat;
    #[cfg(feature = "csv-output")]
    pub use crate::output::{to_csv, write_csv};
    pub use crate::output::{to_json, to_jsonl, to_summary, write_json, write_jsonl};
}
