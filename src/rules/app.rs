//! Notices posted by games and other chat apps.

use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::MessageKind;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{AppName, AppScore, SenderAlias};

const SCORED: Pattern = Pattern::new(
    "app_scored",
    &[
        Tok(SenderAlias),
        Lit("(?: just)? scored "),
        Tok(AppScore),
        Lit(" (?:point |points )?(?:in|playing) "),
        Tok(AppName),
    ],
);
const PERSONAL_BEST: Pattern = Pattern::new(
    "app_personal_best",
    &[
        Tok(SenderAlias),
        Lit(" set a new personal best of "),
        Tok(AppScore),
        Lit(" (?:point |points )?(?:in|playing) "),
        Tok(AppName),
    ],
);
const MOVED_UP: Pattern = Pattern::new(
    "app_moved_up",
    &[Tok(SenderAlias), Lit(" moved up the leaderboard in "), Tok(AppName)],
);
const FIRST_PLACE: Pattern = Pattern::new(
    "app_first_place",
    &[Tok(SenderAlias), Lit(" is now in first place in "), Tok(AppName)],
);
const CHALLENGED: Pattern = Pattern::new(
    "app_challenged",
    &[Tok(SenderAlias), Lit(" challenged you in "), Tok(AppName)],
);

pub(super) const APP_NEW_SCORE: Rule =
    Rule::new("app_new_score", &[&SCORED, &PERSONAL_BEST], app_new_score);
pub(super) const APP_LEADERBOARD_RESHUFFLE: Rule = Rule::new(
    "app_leaderboard_reshuffle",
    &[&MOVED_UP, &FIRST_PLACE],
    app_leaderboard_reshuffle,
);
pub(super) const APP_CHALLENGE: Rule = Rule::new("app_challenge", &[&CHALLENGED], app_challenge);

fn app_new_score(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    for (pattern, personal_best) in [(&SCORED, false), (&PERSONAL_BEST, true)] {
        if let Some(caps) = cx.matches(pattern)? {
            return Ok(Some(MessageKind::AppNewScore {
                app_name: caps.value(AppName).to_string(),
                score: caps.value(AppScore).to_string(),
                personal_best,
            }));
        }
    }
    Ok(None)
}

fn app_leaderboard_reshuffle(
    cx: &mut RuleContext<'_>,
) -> Result<Option<MessageKind>, PatternError> {
    for (pattern, now_in_first_place) in [(&MOVED_UP, false), (&FIRST_PLACE, true)] {
        if let Some(caps) = cx.matches(pattern)? {
            return Ok(Some(MessageKind::AppLeaderboardReshuffle {
                app_name: caps.value(AppName).to_string(),
                now_in_first_place,
            }));
        }
    }
    Ok(None)
}

fn app_challenge(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    Ok(cx.matches(&CHALLENGED)?.map(|caps| MessageKind::AppChallenge {
        app_name: caps.value(AppName).to_string(),
    }))
}
