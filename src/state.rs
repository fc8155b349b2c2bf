//! Per-conversation flags that rules read and write.

/// State carried across events during one chat build.
///
/// Only rules change these flags, and only when they match: a call start sets
/// `call_is_active`, a call end clears it, and the plan rules do the same for
/// `plan_is_active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub call_is_active: bool,
    pub plan_is_active: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }
}
