use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::MessageKind;
use crate::participant::Participant;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{Anything, ParticipantName, SenderAlias};

const CLEARED_OWN: Pattern = Pattern::new(
    "nickname_cleared_own",
    &[Tok(SenderAlias), Lit(r" cleared (?:his|her|their) own nickname\.")],
);
const CLEARED_YOURS: Pattern = Pattern::new(
    "nickname_cleared_yours",
    &[Tok(SenderAlias), Lit(r" cleared your nickname\.")],
);
const CLEARED_OTHER: Pattern = Pattern::new(
    "nickname_cleared_other",
    &[Tok(SenderAlias), Lit(" cleared the nickname for "), Tok(ParticipantName)],
);
const SET_OTHER: Pattern = Pattern::new(
    "nickname_set_other",
    &[
        Tok(SenderAlias),
        Lit(" set the nickname for "),
        Tok(ParticipantName),
        Lit(" to "),
        Tok(Anything),
    ],
);
const SET_YOURS: Pattern = Pattern::new(
    "nickname_set_yours",
    &[Tok(SenderAlias), Lit(" set your nickname to "), Tok(Anything)],
);
const SET_OWN: Pattern = Pattern::new(
    "nickname_set_own",
    &[Tok(SenderAlias), Lit(" set (?:his|her|their) own nickname to "), Tok(Anything)],
);

pub(super) const NICKNAME_CHANGE: Rule = Rule::new(
    "nickname_change",
    &[
        &CLEARED_OWN,
        &CLEARED_YOURS,
        &CLEARED_OTHER,
        &SET_OTHER,
        &SET_YOURS,
        &SET_OWN,
    ],
    nickname_change,
);

fn change(new_nickname: Option<String>, setter: Participant, subject: Participant) -> MessageKind {
    MessageKind::NicknameChange {
        new_nickname,
        setter,
        subject,
    }
}

fn nickname_change(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let sender = cx.sender();

    if cx.is_match(&CLEARED_OWN)? {
        return Ok(Some(change(None, sender.clone(), sender)));
    }

    if cx.is_match(&CLEARED_YOURS)? {
        let owner = cx.owner();
        return Ok(Some(change(None, sender, owner)));
    }

    if let Some(caps) = cx.matches(&CLEARED_OTHER)? {
        let subject = cx.participant(caps.value(ParticipantName));
        return Ok(Some(change(None, sender, subject)));
    }

    if let Some(caps) = cx.matches(&SET_OTHER)? {
        let subject = cx.participant(caps.value(ParticipantName));
        let nickname = caps.value(Anything).to_string();
        return Ok(Some(change(Some(nickname), sender, subject)));
    }

    if let Some(caps) = cx.matches(&SET_YOURS)? {
        let owner = cx.owner();
        let nickname = caps.value(Anything).to_string();
        return Ok(Some(change(Some(nickname), sender, owner)));
    }

    if let Some(caps) = cx.matches(&SET_OWN)? {
        let nickname = caps.value(Anything).to_string();
        return Ok(Some(change(Some(nickname), sender.clone(), sender)));
    }

    Ok(None)
}
