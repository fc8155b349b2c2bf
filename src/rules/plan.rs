//! Event plans.
//!
//! Creation only fires while no plan is active; everything else only while one
//! is. Deletion and the "now" reminders end the plan.

use super::{Rule, RuleContext};
use crate::error::PatternError;
use crate::message::MessageKind;
use crate::tokens::Pattern;
use crate::tokens::Segment::{Lit, Tok};
use crate::tokens::Token::{Anything, PlanDateTime, PlanTime, PlanTitle, SenderAlias};

const STARTED: Pattern = Pattern::new(
    "plan_started",
    &[Tok(SenderAlias), Lit(r" started a plan\.")],
);
const RENAMED: Pattern = Pattern::new(
    "plan_renamed",
    &[Tok(SenderAlias), Lit(" named the plan "), Tok(Anything)],
);
const RESCHEDULED: Pattern = Pattern::new(
    "plan_rescheduled",
    &[Tok(SenderAlias), Lit(" updated the plan to "), Tok(PlanDateTime)],
);
const DELETED_TITLED: Pattern = Pattern::new(
    "plan_deleted_titled",
    &[
        Tok(SenderAlias),
        Lit(" deleted the plan "),
        Tok(PlanTitle),
        Lit(" for "),
        Tok(PlanDateTime),
    ],
);
const DELETED: Pattern = Pattern::new(
    "plan_deleted",
    &[Tok(SenderAlias), Lit(" deleted the plan for "), Tok(PlanDateTime)],
);
const RESPONDED: Pattern = Pattern::new("plan_responded", &[Tok(SenderAlias), Lit(" responded ")]);
const REMINDER_SOON: Pattern = Pattern::new(
    "plan_reminder_soon",
    &[Lit("Reminder, 30 minutes until "), Tok(PlanTime), Lit(r"\.")],
);
const REMINDER_SOON_TITLED: Pattern = Pattern::new(
    "plan_reminder_soon_titled",
    &[
        Lit("Reminder, 30 minutes until "),
        Tok(PlanTitle),
        Lit(" at "),
        Tok(PlanTime),
    ],
);
const REMINDER_NOW: Pattern = Pattern::new(
    "plan_reminder_now",
    &[Lit("Reminder at "), Tok(PlanTime), Lit(r"\.")],
);
const REMINDER_NOW_TITLED: Pattern = Pattern::new(
    "plan_reminder_now_titled",
    &[Lit("Reminder, "), Tok(PlanTitle), Lit(" at "), Tok(PlanTime)],
);

pub(super) const PLAN_CREATION: Rule = Rule::new("plan_creation", &[&STARTED], plan_creation);
pub(super) const PLAN_UPDATE: Rule =
    Rule::new("plan_update", &[&RENAMED, &RESCHEDULED], plan_update);
pub(super) const PLAN_DELETION: Rule =
    Rule::new("plan_deletion", &[&DELETED_TITLED, &DELETED], plan_deletion);
pub(super) const PLAN_RESPONDENCY: Rule =
    Rule::new("plan_respondency", &[&RESPONDED], plan_respondency);
pub(super) const PLAN_REMINDER: Rule = Rule::new(
    "plan_reminder",
    &[
        &REMINDER_SOON,
        &REMINDER_SOON_TITLED,
        &REMINDER_NOW,
        &REMINDER_NOW_TITLED,
    ],
    plan_reminder,
);

/// Notices that only make sense while a plan is active.
const IN_PLAN_NOTICES: [&Pattern; 9] = [
    &RENAMED,
    &RESCHEDULED,
    &DELETED_TITLED,
    &DELETED,
    &RESPONDED,
    &REMINDER_SOON,
    &REMINDER_SOON_TITLED,
    &REMINDER_NOW,
    &REMINDER_NOW_TITLED,
];

/// Whether the event is a plan notice arriving while no plan is active.
pub(super) fn is_stray_notice(cx: &mut RuleContext<'_>) -> Result<bool, PatternError> {
    if cx.state().plan_is_active {
        return Ok(false);
    }
    for pattern in IN_PLAN_NOTICES {
        if cx.is_match(pattern)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn plan_creation(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if cx.state().plan_is_active || !cx.is_match(&STARTED)? {
        return Ok(None);
    }
    cx.state_mut().plan_is_active = true;
    Ok(Some(MessageKind::PlanCreation))
}

fn plan_update(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().plan_is_active {
        return Ok(None);
    }

    if let Some(caps) = cx.matches(&RENAMED)? {
        return Ok(Some(MessageKind::PlanUpdate {
            new_title: Some(caps.value(Anything).to_string()),
            new_date_time: None,
        }));
    }

    if let Some(caps) = cx.matches(&RESCHEDULED)? {
        return Ok(Some(MessageKind::PlanUpdate {
            new_title: None,
            new_date_time: Some(caps.value(PlanDateTime).to_string()),
        }));
    }

    Ok(None)
}

fn plan_deletion(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().plan_is_active {
        return Ok(None);
    }

    let kind = if let Some(caps) = cx.matches(&DELETED_TITLED)? {
        MessageKind::PlanDeletion {
            title: Some(caps.value(PlanTitle).to_string()),
            date_time: caps.value(PlanDateTime).to_string(),
        }
    } else if let Some(caps) = cx.matches(&DELETED)? {
        MessageKind::PlanDeletion {
            title: None,
            date_time: caps.value(PlanDateTime).to_string(),
        }
    } else {
        return Ok(None);
    };

    cx.state_mut().plan_is_active = false;
    Ok(Some(kind))
}

fn plan_respondency(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().plan_is_active {
        return Ok(None);
    }
    Ok(cx.is_match(&RESPONDED)?.then_some(MessageKind::PlanRespondency))
}

fn plan_reminder(cx: &mut RuleContext<'_>) -> Result<Option<MessageKind>, PatternError> {
    if !cx.state().plan_is_active {
        return Ok(None);
    }

    let alternatives = [
        (&REMINDER_SOON, false),
        (&REMINDER_SOON_TITLED, false),
        (&REMINDER_NOW, true),
        (&REMINDER_NOW_TITLED, true),
    ];
    for (pattern, is_concurrent) in alternatives {
        let Some(caps) = cx.matches(pattern)? else {
            continue;
        };
        if is_concurrent {
            cx.state_mut().plan_is_active = false;
        }
        let title = caps.get(PlanTitle).map(|title| title.first().to_string());
        return Ok(Some(MessageKind::PlanReminder {
            is_concurrent,
            title,
            time: caps.value(PlanTime).to_string(),
        }));
    }

    Ok(None)
}
