//! Group membership changes. These are recognised by the export's `type`
//! rather than by their wording.

use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::event::EventKind;
use crate::message::MessageKind;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::ParticipantName;

const LEFT: Pattern = Pattern::new(
    "membership_left",
    &[Tok(ParticipantName), Lit(r" left the group\.")],
);

pub(super) const SUBSCRIBE: Rule = Rule::new("subscribe", &[], subscribe);
pub(super) const UNSUBSCRIBE: Rule = Rule::new("unsubscribe", &[&LEFT], unsubscribe);

fn subscribe(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let event = cx.event();
    if event.kind != EventKind::Subscribe {
        return Ok(None);
    }

    let invitees = event
        .users
        .iter()
        .flatten()
        .map(|user| cx.participant(&user.name))
        .collect();
    Ok(Some(MessageKind::Subscribe {
        inviter: cx.sender(),
        invitees,
    }))
}

fn unsubscribe(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let event = cx.event();
    if event.kind != EventKind::Unsubscribe {
        return Ok(None);
    }

    let sender = cx.sender();
    if cx.is_match(&LEFT)? {
        return Ok(Some(MessageKind::Unsubscribe {
            removed_self: true,
            removalist: sender.clone(),
            removed: sender,
        }));
    }

    let removed = match event.users.as_deref().and_then(<[_]>::first) {
        Some(user) => cx.participant(&user.name),
        None => cx.unknown(),
    };
    Ok(Some(MessageKind::Unsubscribe {
        removed_self: false,
        removalist: sender,
        removed,
    }))
}
