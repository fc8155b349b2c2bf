use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::MessageKind;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{ParticipantName, SenderAlias};

const ADDED: Pattern = Pattern::new(
    "admin_added",
    &[
        Tok(SenderAlias),
        Lit(" added "),
        Tok(ParticipantName),
        Lit(r" as a group admin\."),
    ],
);
const REMOVED: Pattern = Pattern::new(
    "admin_removed",
    &[
        Tok(SenderAlias),
        Lit(" removed "),
        Tok(ParticipantName),
        Lit(r" as a group admin\."),
    ],
);

pub(super) const ADMIN_ADD: Rule = Rule::new("admin_add", &[&ADDED], admin_add);
pub(super) const ADMIN_REMOVE: Rule = Rule::new("admin_remove", &[&REMOVED], admin_remove);

fn admin_add(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let Some(caps) = cx.matches(&ADDED)? else {
        return Ok(None);
    };
    Ok(Some(MessageKind::AdminAdd {
        instigator: cx.sender(),
        subject: cx.participant(caps.value(ParticipantName)),
    }))
}

fn admin_remove(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let Some(caps) = cx.matches(&REMOVED)? else {
        return Ok(None);
    };
    Ok(Some(MessageKind::AdminRemove {
        instigator: cx.sender(),
        subject: cx.participant(caps.value(ParticipantName)),
    }))
}
