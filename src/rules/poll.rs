use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::MessageKind;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{Anything, Number, PollName, PollOption, SenderAlias};
use crate::tokens::{Captures, Pattern};

const CREATED: Pattern = Pattern::new(
    "poll_created",
    &[Tok(SenderAlias), Lit(" created a poll: "), Tok(Anything)],
);
const VOTED_MANY: Pattern = Pattern::new(
    "poll_voted_many",
    &[
        Tok(SenderAlias),
        Lit(" voted for \""),
        Tok(PollOption),
        Lit("\" and "),
        Tok(Number),
        Lit(" other options? in the poll: "),
        Tok(PollName),
    ],
);
const VOTED: Pattern = Pattern::new(
    "poll_voted",
    &[
        Tok(SenderAlias),
        Lit(" voted for \""),
        Tok(PollOption),
        Lit("\" in the poll: "),
        Tok(PollName),
    ],
);
const UNVOTED_MANY: Pattern = Pattern::new(
    "poll_unvoted_many",
    &[
        Tok(SenderAlias),
        Lit(" removed (?:your |his |her |their )?vote for \""),
        Tok(PollOption),
        Lit("\" and "),
        Tok(Number),
        Lit(" other options? in the poll: "),
        Tok(PollName),
    ],
);
const UNVOTED: Pattern = Pattern::new(
    "poll_unvoted",
    &[
        Tok(SenderAlias),
        Lit(" removed (?:your |his |her |their )?vote for \""),
        Tok(PollOption),
        Lit("\" in the poll: "),
        Tok(PollName),
    ],
);
const REVOTED: Pattern = Pattern::new(
    "poll_revoted",
    &[
        Tok(SenderAlias),
        Lit(" changed (?:your |his |her |their )?vote to \""),
        Tok(PollOption),
        Lit("\" in the poll: "),
        Tok(PollName),
    ],
);
const EXPIRED: Pattern = Pattern::new("poll_expired", &[Lit(r"This poll is no longer available\.")]);

pub(super) const POLL_CREATION: Rule = Rule::new("poll_creation", &[&CREATED], poll_creation);
pub(super) const POLL_ADD_VOTE: Rule =
    Rule::new("poll_add_vote", &[&VOTED_MANY, &VOTED], poll_add_vote);
pub(super) const POLL_REMOVE_VOTE: Rule =
    Rule::new("poll_remove_vote", &[&UNVOTED_MANY, &UNVOTED], poll_remove_vote);
pub(super) const POLL_CHANGE_VOTE: Rule =
    Rule::new("poll_change_vote", &[&REVOTED], poll_change_vote);
pub(super) const POLL_EXPIRED: Rule = Rule::new("poll_expired", &[&EXPIRED], poll_expired);

/// A vote sentence: option, poll and how many further options were folded in.
struct Vote {
    poll_name: String,
    vote_option: String,
    hidden_vote_count: u32,
}

/// Tries the "and N other options" form first, then the single-option form.
///
/// A count too large for `u32` is treated as a non-match of the first form.
fn match_vote(
    cx: &mut RuleContext<'_>,
    many: &Pattern,
    single: &Pattern,
) -> Result<Option<Vote>, PatternError> {
    if let Some(caps) = cx.matches(many)? {
        if let Ok(hidden_vote_count) = caps.value(Number).parse() {
            return Ok(Some(vote(&caps, hidden_vote_count)));
        }
    }
    Ok(cx.matches(single)?.map(|caps| vote(&caps, 0)))
}

fn vote(caps: &Captures, hidden_vote_count: u32) -> Vote {
    Vote {
        poll_name: caps.value(PollName).to_string(),
        vote_option: caps.value(PollOption).to_string(),
        hidden_vote_count,
    }
}

fn poll_creation(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.matches(&CREATED)?.map(|caps| MessageKind::PollCreation {
        poll_name: caps.value(Anything).to_string(),
    }))
}

fn poll_add_vote(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(match_vote(cx, &VOTED_MANY, &VOTED)?.map(|vote| MessageKind::PollAddVote {
        poll_name: vote.poll_name,
        vote_option: vote.vote_option,
        hidden_vote_count: vote.hidden_vote_count,
    }))
}

fn poll_remove_vote(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(match_vote(cx, &UNVOTED_MANY, &UNVOTED)?.map(|vote| MessageKind::PollRemoveVote {
        poll_name: vote.poll_name,
        vote_option: vote.vote_option,
        hidden_vote_count: vote.hidden_vote_count,
    }))
}

fn poll_change_vote(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.matches(&REVOTED)?.map(|caps| MessageKind::PollChangeVote {
        poll_name: caps.value(PollName).to_string(),
        vote_option: caps.value(PollOption).to_string(),
    }))
}

fn poll_expired(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.is_match(&EXPIRED)?.then_some(MessageKind::PollExpired))
}
