//! Classification rules and dispatch.
//!
//! A [`Rule`] looks at one raw event and either returns the [`MessageKind`] it
//! recognises or passes. A [`Ruleset`] tries its rules in order and the first
//! match wins; if nothing matches the event becomes
//! [`MessageKind::Unrecognized`].
//!
//! # Precedence
//!
//! [`Ruleset::standard`] orders rules as follows:
//!
//! 1. attachments, then entries with no content at all;
//! 2. the stateful call rules, which must see call sentences before anything
//!    that would accept them as plain text;
//! 3. nickname, settings, plan, poll, admin and app notices;
//! 4. waves, then plain text (`Generic` entries other than call or plan
//!    notices that arrive while their gate is closed);
//! 5. subscribe/unsubscribe, and last the shared-link catch-all.
//!
//! # Writing a rule
//!
//! Each rule declares the [`Pattern`]s it may try so that the whole set can be
//! validated up front and checked for id collisions. Alternatives are tried in
//! order and the first that matches wins. State changes and participant
//! lookups happen only on the branch that matched.

mod admin;
mod app;
mod basic;
mod call;
mod membership;
mod nickname;
mod plan;
mod poll;
mod settings;

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::error::PatternError;
use crate::event::RawEvent;
use crate::message::{Message, MessageKind, Reaction};
use crate::participant::{Participant, ParticipantRegistry};
use crate::state::ConversationState;
use crate::tokens::{Captures, Pattern, TokenMatcher};

/// Signature of a rule body.
pub type RuleFn = fn(&mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError>;

/// Everything a rule may look at or change while classifying one event.
pub struct RuleContext<'a> {
    event: &'a RawEvent,
    sender: Participant,
    state: &'a mut ConversationState,
    participants: &'a mut ParticipantRegistry,
    matcher: &'a mut TokenMatcher,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        event: &'a RawEvent,
        sender: Participant,
        state: &'a mut ConversationState,
        participants: &'a mut ParticipantRegistry,
        matcher: &'a mut TokenMatcher,
    ) -> Self {
        Self {
            event,
            sender,
            state,
            participants,
            matcher,
        }
    }

    /// The event being classified.
    pub fn event(&self) -> &'a RawEvent {
        self.event
    }

    /// The event's sender.
    pub fn sender(&self) -> Participant {
        self.sender.clone()
    }

    pub fn state(&self) -> &ConversationState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut ConversationState {
        self.state
    }

    /// Resolves a participant by name.
    pub fn participant(&mut self, name: &str) -> Participant {
        self.participants.request(name)
    }

    /// Resolves the archive owner ("you" in the export's sentences).
    pub fn owner(&mut self) -> Participant {
        self.participants.request_owner()
    }

    /// Resolves the unknown persona.
    pub fn unknown(&mut self) -> Participant {
        self.participants.request_unknown()
    }

    /// Matches the event's content against `pattern`.
    ///
    /// Events without content never match.
    pub fn matches(&mut self, pattern: &Pattern) -> Result<Option<Captures>, PatternError> {
        let event = self.event;
        match event.content.as_deref() {
            Some(content) => self.matcher.matches(pattern, content),
            None => Ok(None),
        }
    }

    /// Like [`matches`](Self::matches) when the captures are not needed.
    pub fn is_match(&mut self, pattern: &Pattern) -> Result<bool, PatternError> {
        Ok(self.matches(pattern)?.is_some())
    }
}

/// A named classification rule.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Name used in logs.
    pub name: &'static str,
    /// Every pattern the rule body may try.
    pub patterns: &'static [&'static Pattern],
    apply: RuleFn,
}

impl Rule {
    pub const fn new(
        name: &'static str,
        patterns: &'static [&'static Pattern],
        apply: RuleFn,
    ) -> Self {
        Self {
            name,
            patterns,
            apply,
        }
    }

    /// Runs the rule against the event in `cx`.
    pub fn apply(&self, cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
        (self.apply)(cx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

/// An ordered collection of rules.
#[derive(Debug, Clone)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::standard()
    }
}

impl Ruleset {
    /// Creates a ruleset; earlier rules take precedence.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rules for English-language Messenger exports.
    pub fn standard() -> Self {
        Self::new(vec![
            basic::MEDIA,
            basic::EMPTY,
            call::CALL_START,
            call::CALL_JOIN,
            call::CALL_SHARE_VIDEO,
            call::CALL_END,
            nickname::NICKNAME_CHANGE,
            settings::CHAT_SETTINGS_CHANGE,
            plan::PLAN_CREATION,
            plan::PLAN_UPDATE,
            plan::PLAN_DELETION,
            plan::PLAN_RESPONDENCY,
            plan::PLAN_REMINDER,
            poll::POLL_CREATION,
            poll::POLL_ADD_VOTE,
            poll::POLL_REMOVE_VOTE,
            poll::POLL_CHANGE_VOTE,
            poll::POLL_EXPIRED,
            admin::ADMIN_ADD,
            admin::ADMIN_REMOVE,
            app::APP_NEW_SCORE,
            app::APP_LEADERBOARD_RESHUFFLE,
            app::APP_CHALLENGE,
            basic::WAVE,
            basic::TEXT,
            membership::SUBSCRIBE,
            membership::UNSUBSCRIBE,
            basic::LINK,
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over every pattern declared by every rule.
    pub fn patterns(&self) -> impl Iterator<Item = &'static Pattern> + '_ {
        self.rules.iter().flat_map(|rule| rule.patterns.iter().copied())
    }

    /// Compiles every declared pattern, surfacing malformed rules before any
    /// event is processed. Also rejects two different patterns sharing an id.
    pub fn validate(&self, matcher: &mut TokenMatcher) -> Result<(), PatternError> {
        let mut seen: HashSet<&'static str> = HashSet::new();
        let mut by_id: Vec<&'static Pattern> = Vec::new();
        for pattern in self.patterns() {
            if !seen.insert(pattern.id) {
                if by_id.iter().any(|p| p.id == pattern.id && *p != pattern) {
                    return Err(PatternError::DuplicateId { id: pattern.id });
                }
                continue;
            }
            by_id.push(pattern);
            matcher.compile(pattern)?;
        }
        Ok(())
    }

    /// Returns the kind produced by the first matching rule, or
    /// [`MessageKind::Unrecognized`].
    pub fn classify(&self, cx: &mut RuleContext<'_>) -> Result<MessageKind, PatternError> {
        for rule in &self.rules {
            if let Some(kind) = rule.apply(cx)? {
                trace!(rule = rule.name, timestamp_ms = cx.event().timestamp_ms, "matched");
                return Ok(kind);
            }
        }

        debug!(
            timestamp_ms = cx.event().timestamp_ms,
            kind = %cx.event().kind,
            "no rule matched event"
        );
        Ok(MessageKind::Unrecognized)
    }

    /// Classifies `event` and assembles its [`Message`].
    ///
    /// Always yields exactly one message; errors only come from malformed
    /// patterns.
    pub fn apply(
        &self,
        event: RawEvent,
        state: &mut ConversationState,
        participants: &mut ParticipantRegistry,
        matcher: &mut TokenMatcher,
    ) -> Result<Message, PatternError> {
        let sender = participants.request(&event.sender_name);

        let kind = {
            let mut cx = RuleContext::new(&event, sender.clone(), state, participants, matcher);
            self.classify(&mut cx)?
        };

        let reactions = event
            .reactions
            .iter()
            .flatten()
            .map(|reaction| Reaction {
                emoji: reaction.reaction.clone(),
                sender: participants.request(&reaction.actor),
            })
            .collect();

        Ok(Message::new(event, sender, reactions, kind))
    }
}
