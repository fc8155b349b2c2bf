//! Call lifecycle. Start only fires while no call is active; join, share and
//! end only while one is.

use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::{CallType, MessageKind};
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::SenderAlias;

const STARTED_VIDEO: Pattern = Pattern::new(
    "call_start_video",
    &[Tok(SenderAlias), Lit(r" started a video chat\.")],
);
const STARTED_AUDIO: Pattern = Pattern::new(
    "call_start_audio",
    &[Tok(SenderAlias), Lit(r" started a call\.")],
);
const JOINED_VIDEO: Pattern = Pattern::new(
    "call_join_video",
    &[Tok(SenderAlias), Lit(r" joined the video chat\.")],
);
const JOINED_AUDIO: Pattern = Pattern::new(
    "call_join_audio",
    &[Tok(SenderAlias), Lit(r" joined the call\.")],
);
const SHARED_VIDEO: Pattern = Pattern::new(
    "call_share_video",
    &[Tok(SenderAlias), Lit(r" started sharing video\.")],
);
const ENDED_VIDEO: Pattern = Pattern::new("call_end_video", &[Lit(r"The video chat ended\.")]);
const ENDED_AUDIO: Pattern = Pattern::new("call_end_audio", &[Lit(r"The call ended\.")]);

pub(super) const CALL_START: Rule =
    Rule::new("call_start", &[&STARTED_VIDEO, &STARTED_AUDIO], call_start);
pub(super) const CALL_JOIN: Rule = Rule::new("call_join", &[&JOINED_VIDEO, &JOINED_AUDIO], call_join);
pub(super) const CALL_SHARE_VIDEO: Rule =
    Rule::new("call_share_video", &[&SHARED_VIDEO], call_share_video);
pub(super) const CALL_END: Rule = Rule::new("call_end", &[&ENDED_VIDEO, &ENDED_AUDIO], call_end);

/// Notices that only make sense while a call is in progress.
const IN_CALL_NOTICES: [&Pattern; 5] = [
    &JOINED_VIDEO,
    &JOINED_AUDIO,
    &SHARED_VIDEO,
    &ENDED_VIDEO,
    &ENDED_AUDIO,
];

/// Whether the event is an in-call notice arriving while no call is active.
pub(super) fn is_stray_notice(cx: &mut RuleContext<'_>) -> Result<bool, PatternError> {
    if cx.state().call_is_active {
        return Ok(false);
    }
    for pattern in IN_CALL_NOTICES {
        if cx.is_match(pattern)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns the call type of the first alternative that matches.
fn match_call_type(
    cx: &mut RuleContext<'_>,
    alternatives: [(&Pattern, CallType); 2],
) -> Result<Option<CallType>, PatternError> {
    for (pattern, call_type) in alternatives {
        if cx.is_match(pattern)? {
            return Ok(Some(call_type));
        }
    }
    Ok(None)
}

fn call_start(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if cx.state().call_is_active {
        return Ok(None);
    }
    let alternatives = [
        (&STARTED_VIDEO, CallType::Video),
        (&STARTED_AUDIO, CallType::Audio),
    ];
    let Some(call_type) = match_call_type(cx, alternatives)? else {
        return Ok(None);
    };
    cx.state_mut().call_is_active = true;
    Ok(Some(MessageKind::CallStart { call_type }))
}

fn call_join(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().call_is_active {
        return Ok(None);
    }
    let alternatives = [
        (&JOINED_VIDEO, CallType::Video),
        (&JOINED_AUDIO, CallType::Audio),
    ];
    Ok(match_call_type(cx, alternatives)?.map(|call_type| MessageKind::CallJoin { call_type }))
}

fn call_share_video(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().call_is_active {
        return Ok(None);
    }
    Ok(cx.is_match(&SHARED_VIDEO)?.then_some(MessageKind::CallShareVideo))
}

fn call_end(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().call_is_active {
        return Ok(None);
    }
    let alternatives = [
        (&ENDED_VIDEO, CallType::Video),
        (&ENDED_AUDIO, CallType::Audio),
    ];
    let Some(call_type) = match_call_type(cx, alternatives)? else {
        return Ok(None);
    };
    cx.state_mut().call_is_active = false;
    Ok(Some(MessageKind::CallEnd { call_type }))
}
