//! Structural rules and the text/link catch-alls.

use super::{Rule, RuleContext, call, plan};
use crate::error::PatternError;
use crate::event::EventKind;
use crate::media::Attachments;
use crate::message::MessageKind;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token;

const WAVED: Pattern = Pattern::new(
    "wave",
    &[Tok(Token::ParticipantFirstName), Lit(r" waved hello to the group\.")],
);

pub(super) const MEDIA: Rule = Rule::new("media", &[], media);
pub(super) const EMPTY: Rule = Rule::new("empty", &[], empty);
pub(super) const WAVE: Rule = Rule::new("wave", &[&WAVED], wave);
pub(super) const TEXT: Rule = Rule::new("text", &[], text);
pub(super) const LINK: Rule = Rule::new("link", &[], link);

fn media(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let event = cx.event();
    if !event.has_attachments() {
        return Ok(None);
    }
    Ok(Some(MessageKind::Media(Attachments::from_event(event))))
}

fn empty(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.event().content.is_none().then_some(MessageKind::Empty))
}

fn wave(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.is_match(&WAVED)?.then_some(MessageKind::Wave))
}

/// Accepts `Generic` entries, except call and plan notices whose gate is
/// closed: those are left unrecognized rather than passed off as chat text.
fn text(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if cx.event().kind != EventKind::Generic {
        return Ok(None);
    }
    if call::is_stray_notice(cx)? || plan::is_stray_notice(cx)? {
        return Ok(None);
    }
    Ok(Some(MessageKind::Text))
}

fn link(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let event = cx.event();
    if event.kind != EventKind::Share && event.share.is_none() {
        return Ok(None);
    }
    Ok(Some(MessageKind::Link {
        shared_link: event.share.as_ref().and_then(|share| share.link.clone()),
    }))
}
