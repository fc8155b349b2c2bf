use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::{ChatSetting, MessageKind};
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{Anything, Emoji, SenderAlias};

const NAMED: Pattern = Pattern::new(
    "settings_name",
    &[Tok(SenderAlias), Lit(" named the group "), Tok(Anything)],
);
const PHOTO: Pattern = Pattern::new(
    "settings_photo",
    &[Tok(SenderAlias), Lit(r" changed the group photo\.")],
);
const THEME: Pattern = Pattern::new(
    "settings_theme",
    &[Tok(SenderAlias), Lit(r" changed the chat theme\.")],
);
const EMOJI: Pattern = Pattern::new(
    "settings_emoji",
    &[Tok(SenderAlias), Lit(" set the emoji to "), Tok(Emoji)],
);
const APPROVAL_ON: Pattern = Pattern::new(
    "settings_approval_on",
    &[
        Tok(SenderAlias),
        Lit(r" turned on member approval and will review requests to join the group\."),
    ],
);
const APPROVAL_OFF: Pattern = Pattern::new(
    "settings_approval_off",
    &[
        Tok(SenderAlias),
        Lit(r" turned off member approval\. Anyone with the link can join the group\."),
    ],
);

pub(super) const CHAT_SETTINGS_CHANGE: Rule = Rule::new(
    "chat_settings_change",
    &[&NAMED, &PHOTO, &THEME, &EMOJI, &APPROVAL_ON, &APPROVAL_OFF],
    chat_settings_change,
);

fn chat_settings_change(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    let setting = if let Some(caps) = cx.matches(&NAMED)? {
        ChatSetting::Name(caps.value(Anything).to_string())
    } else if cx.is_match(&PHOTO)? {
        ChatSetting::Photo
    } else if cx.is_match(&THEME)? {
        ChatSetting::Theme
    } else if let Some(caps) = cx.matches(&EMOJI)? {
        ChatSetting::Emoji(caps.value(Emoji).to_string())
    } else if cx.is_match(&APPROVAL_ON)? {
        ChatSetting::MembershipPolicy(true)
    } else if cx.is_match(&APPROVAL_OFF)? {
        ChatSetting::MembershipPolicy(false)
    } else {
        return Ok(None);
    };

    Ok(Some(MessageKind::ChatSettingsChange(setting)))
}
