//! Reclassified messages.
//!
//! A [`Message`] holds the fields every export entry has (timestamp, content,
//! sender, reactions and the raw entry itself) plus a [`MessageKind`] saying
//! what the entry actually was.
//!
//! # Example
//!
//! ```rust
//! use chatdemux::{build_chat, RawEvent};
//! use chatdemux::message::MessageKind;
//!
//! let feed = vec![RawEvent::text("Jason", 0, "You set the nickname for Milly to M.")];
//! let chat = build_chat(feed, "Jason")?;
//!
//! match &chat.messages()[0].kind {
//!     MessageKind::NicknameChange { new_nickname, subject, .. } => {
//!         assert_eq!(new_nickname.as_deref(), Some("M"));
//!         assert_eq!(subject.name(), "Milly");
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), chatdemux::DemuxError>(())
//! ```
//!
//! # Serialization
//!
//! Messages serialize with participants as names, the kind flattened in under
//! a snake_case `"type"` tag, and the raw entry omitted.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::event::RawEvent;
use crate::media::Attachments;
use crate::participant::Participant;

/// An emoji reaction attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    pub emoji: String,
    pub sender: Participant,
}

/// Whether a call was audio-first or a video chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// An audio call, possibly with video shared later.
    Audio,
    /// A video chat.
    Video,
}

/// Which chat setting a [`MessageKind::ChatSettingsChange`] touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatSettingsType {
    Name,
    Photo,
    Theme,
    Emoji,
    MembershipPolicy,
}

/// A change to a group setting, with its new value where the export gives one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum ChatSetting {
    Name(String),
    Photo,
    Theme,
    Emoji(String),
    /// `true` when member approval was turned on.
    MembershipPolicy(bool),
}

impl ChatSetting {
    pub fn settings_type(&self) -> ChatSettingsType {
        match self {
            ChatSetting::Name(_) => ChatSettingsType::Name,
            ChatSetting::Photo => ChatSettingsType::Photo,
            ChatSetting::Theme => ChatSettingsType::Theme,
            ChatSetting::Emoji(_) => ChatSettingsType::Emoji,
            ChatSetting::MembershipPolicy(_) => ChatSettingsType::MembershipPolicy,
        }
    }

    pub fn new_name(&self) -> Option<&str> {
        match self {
            ChatSetting::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn new_emoji(&self) -> Option<&str> {
        match self {
            ChatSetting::Emoji(emoji) => Some(emoji),
            _ => None,
        }
    }

    pub fn approval_is_required(&self) -> Option<bool> {
        match self {
            ChatSetting::MembershipPolicy(required) => Some(*required),
            _ => None,
        }
    }
}

/// What a message turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    /// No rule recognised the entry.
    Unrecognized,
    /// Photos, GIFs, audio, video, stickers or files.
    Media(Attachments),
    /// The entry has no content field at all.
    Empty,
    CallStart {
        call_type: CallType,
    },
    CallJoin {
        call_type: CallType,
    },
    CallShareVideo,
    CallEnd {
        call_type: CallType,
    },
    /// `new_nickname` is `None` when the nickname was cleared.
    NicknameChange {
        new_nickname: Option<String>,
        setter: Participant,
        subject: Participant,
    },
    ChatSettingsChange(ChatSetting),
    PlanCreation,
    PlanUpdate {
        new_title: Option<String>,
        new_date_time: Option<String>,
    },
    PlanDeletion {
        title: Option<String>,
        date_time: String,
    },
    PlanRespondency,
    /// `is_concurrent` is `true` for "the plan starts now" reminders and
    /// `false` for "30 minutes until" reminders.
    PlanReminder {
        is_concurrent: bool,
        title: Option<String>,
        time: String,
    },
    PollCreation {
        poll_name: String,
    },
    /// `hidden_vote_count` counts the "and N other options" the export folds
    /// into one sentence.
    PollAddVote {
        poll_name: String,
        vote_option: String,
        hidden_vote_count: u32,
    },
    PollRemoveVote {
        poll_name: String,
        vote_option: String,
        hidden_vote_count: u32,
    },
    PollChangeVote {
        poll_name: String,
        vote_option: String,
    },
    PollExpired,
    AdminAdd {
        instigator: Participant,
        subject: Participant,
    },
    AdminRemove {
        instigator: Participant,
        subject: Participant,
    },
    AppNewScore {
        app_name: String,
        score: String,
        personal_best: bool,
    },
    AppLeaderboardReshuffle {
        app_name: String,
        now_in_first_place: bool,
    },
    AppChallenge {
        app_name: String,
    },
    Text,
    /// `invitees` may hold fewer unknown participants than were actually
    /// added; the export names them all the same.
    Subscribe {
        inviter: Participant,
        invitees: Vec<Participant>,
    },
    Unsubscribe {
        removed_self: bool,
        removalist: Participant,
        removed: Participant,
    },
    Wave,
    Link {
        shared_link: Option<String>,
    },
}

impl MessageKind {
    /// Returns the snake_case name of this variant, as used in serialized
    /// output.
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::Unrecognized => "unrecognized",
            MessageKind::Media(_) => "media",
            MessageKind::Empty => "empty",
            MessageKind::CallStart { .. } => "call_start",
            MessageKind::CallJoin { .. } => "call_join",
            MessageKind::CallShareVideo => "call_share_video",
            MessageKind::CallEnd { .. } => "call_end",
            MessageKind::NicknameChange { .. } => "nickname_change",
            MessageKind::ChatSettingsChange(_) => "chat_settings_change",
            MessageKind::PlanCreation => "plan_creation",
            MessageKind::PlanUpdate { .. } => "plan_update",
            MessageKind::PlanDeletion { .. } => "plan_deletion",
            MessageKind::PlanRespondency => "plan_respondency",
            MessageKind::PlanReminder { .. } => "plan_reminder",
            MessageKind::PollCreation { .. } => "poll_creation",
            MessageKind::PollAddVote { .. } => "poll_add_vote",
            MessageKind::PollRemoveVote { .. } => "poll_remove_vote",
            MessageKind::PollChangeVote { .. } => "poll_change_vote",
            MessageKind::PollExpired => "poll_expired",
            MessageKind::AdminAdd { .. } => "admin_add",
            MessageKind::AdminRemove { .. } => "admin_remove",
            MessageKind::AppNewScore { .. } => "app_new_score",
            MessageKind::AppLeaderboardReshuffle { .. } => "app_leaderboard_reshuffle",
            MessageKind::AppChallenge { .. } => "app_challenge",
            MessageKind::Text => "text",
            MessageKind::Subscribe { .. } => "subscribe",
            MessageKind::Unsubscribe { .. } => "unsubscribe",
            MessageKind::Wave => "wave",
            MessageKind::Link { .. } => "link",
        }
    }

    /// Returns `true` for [`MessageKind::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, MessageKind::Text)
    }

    /// Returns `true` for [`MessageKind::Unrecognized`].
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, MessageKind::Unrecognized)
    }
}

/// A reclassified export entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// The entry's text, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub sender: Participant,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    #[serde(flatten)]
    pub kind: MessageKind,
    #[serde(skip)]
    raw: RawEvent,
}

impl Message {
    /// Creates a message, taking the base fields from `raw`.
    pub fn new(
        raw: RawEvent,
        sender: Participant,
        reactions: Vec<Reaction>,
        kind: MessageKind,
    ) -> Self {
        Self {
            timestamp_ms: raw.timestamp_ms,
            content: raw.content.clone(),
            sender,
            reactions,
            kind,
            raw,
        }
    }

    /// Returns the export entry this message was built from, for fields the
    /// model does not cover.
    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    /// Returns the timestamp as a UTC date-time.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }

    /// Returns the content, or `""` if there is none.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}
