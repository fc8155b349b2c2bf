//! Building a [`Chat`] from a feed.
//!
//! One build owns one [`ConversationState`], one [`ParticipantRegistry`] and
//! one [`TokenMatcher`]. Events are dispatched oldest first and every event
//! yields exactly one message.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::feed::ChatFeed;
use crate::message::Message;
use crate::participant::{Participant, ParticipantRegistry};
use crate::progress::ProgressReporter;
use crate::rules::Ruleset;
use crate::state::ConversationState;

/// A reclassified conversation.
#[derive(Debug, Clone)]
pub struct Chat {
    messages: Vec<Message>,
    participants: Vec<Participant>,
    by_name: HashMap<String, Participant>,
    unknown: Participant,
}

impl Chat {
    fn new(messages: Vec<Message>, registry: ParticipantRegistry) -> Self {
        let (participants, unknown) = registry.into_parts();
        let by_name = participants
            .iter()
            .filter(|p| **p != unknown)
            .map(|p| (p.name().to_string(), p.clone()))
            .collect();
        Self {
            messages,
            participants,
            by_name,
            unknown,
        }
    }

    /// Messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Everyone referenced anywhere in the conversation, in order of first
    /// appearance. Includes the unknown persona only if it was referenced.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Looks up a named participant. Placeholder names never resolve; use
    /// [`unknown_participant`](Self::unknown_participant) instead.
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.by_name.get(name)
    }

    /// The single persona standing in for every unidentifiable member.
    pub fn unknown_participant(&self) -> &Participant {
        &self.unknown
    }

    /// The archive owner, if they appear in the conversation.
    pub fn owner(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_owner())
    }

    /// How many messages of each kind the chat holds, keyed by
    /// [`MessageKind::name`](crate::message::MessageKind::name).
    pub fn kind_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for message in &self.messages {
            *counts.entry(message.kind.name()).or_insert(0) += 1;
        }
        counts
    }
}

/// Configures and runs a chat build.
///
/// # Example
///
/// ```rust
/// use chatdemux::chat::ChatBuilder;
/// use chatdemux::config::BuildConfig;
/// use chatdemux::message::MessageKind;
/// use chatdemux::tokens::Token;
/// use chatdemux::RawEvent;
///
/// let config = BuildConfig::new().with_token_pattern(Token::PlanTime, r"(\d{1,2}:\d{2})");
/// let feed = vec![
///     RawEvent::text("Ann", 0, "Ann started a plan."),
///     RawEvent::text("Sys", 1, "Reminder at 14:00."),
/// ];
/// let chat = ChatBuilder::new("Ann").with_config(config).build(feed)?;
///
/// assert!(matches!(
///     &chat.messages()[1].kind,
///     MessageKind::PlanReminder { is_concurrent: true, time, .. } if time == "14:00"
/// ));
/// # Ok::<(), chatdemux::DemuxError>(())
/// ```
pub struct ChatBuilder<'a> {
    owner: String,
    config: BuildConfig,
    ruleset: Ruleset,
    progress: Option<&'a mut dyn ProgressReporter>,
}

impl<'a> ChatBuilder<'a> {
    /// Creates a builder for an archive downloaded by `owner_name`.
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner: owner_name.into(),
            config: BuildConfig::default(),
            ruleset: Ruleset::standard(),
            progress: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the standard rules.
    #[must_use]
    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, reporter: &'a mut dyn ProgressReporter) -> Self {
        self.progress = Some(reporter);
        self
    }

    /// Runs the build.
    ///
    /// Fails only if a placeholder override or a rule pattern is malformed;
    /// both are checked before the first event is read.
    pub fn build(self, feed: impl ChatFeed) -> Result<Chat> {
        let Self {
            owner,
            config,
            ruleset,
            mut progress,
        } = self;

        let mut matcher = config.matcher()?;
        ruleset.validate(&mut matcher)?;

        let mut state = ConversationState::new();
        let mut registry = ParticipantRegistry::new(owner.as_str());
        let mut messages = Vec::new();

        debug!(owner = %owner, rules = ruleset.len(), "building chat");
        if let Some(reporter) = progress.as_deref_mut() {
            reporter.on_start();
        }

        for event in feed.into_events() {
            let message = ruleset.apply(event, &mut state, &mut registry, &mut matcher)?;
            if let Some(reporter) = progress.as_deref_mut() {
                reporter.on_message(&message);
            }
            messages.push(message);
        }

        if let Some(reporter) = progress.as_deref_mut() {
            reporter.on_finish();
        }

        let chat = Chat::new(messages, registry);
        debug!(
            messages = chat.messages.len(),
            participants = chat.participants.len(),
            "chat built"
        );
        Ok(chat)
    }
}

/// Builds a chat with the standard rules.
///
/// `owner_name` is the name of the person who downloaded the archive; the
/// export's "You ..." sentences refer to them.
///
/// ```rust
/// use chatdemux::{build_chat, RawEvent};
///
/// let chat = build_chat(vec![RawEvent::text("Ann", 0, "Hello")], "Ann")?;
/// assert!(chat.messages()[0].kind.is_text());
/// assert!(chat.participant("Ann").unwrap().is_owner());
/// # Ok::<(), chatdemux::DemuxError>(())
/// ```
pub fn build_chat(feed: impl ChatFeed, owner_name: &str) -> Result<Chat> {
    ChatBuilder::new(owner_name).build(feed)
}
