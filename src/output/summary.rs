use std::fmt::Write;

use crate::chat::Chat;

/// Renders a short report: message and participant totals, then the count
/// of each message type, most frequent first.
///
/// ```rust
/// use chatdemux::output::to_summary;
/// use chatdemux::{build_chat, RawEvent};
///
/// let chat = build_chat(vec![RawEvent::text("Ann", 0, "Hi")], "Ann")?;
/// let summary = to_summary(&chat);
/// assert!(summary.contains("Messages: 1"));
/// assert!(summary.contains("text: 1"));
/// # Ok::<(), chatdemux::DemuxError>(())
/// ```
pub fn to_summary(chat: &Chat) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Messages: {}", chat.messages().len());

    let names: Vec<String> = chat
        .participants()
        .iter()
        .map(|p| {
            if p.is_owner() {
                format!("{} (owner)", p.name())
            } else {
                p.name().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Participants ({}): {}", names.len(), names.join(", "));

    let mut counts: Vec<_> = chat.kind_counts().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    if !counts.is_empty() {
        let _ = writeln!(out, "Types:");
    }
    for (kind, count) in counts {
        let _ = writeln!(out, "  {kind}: {count}");
    }
    out
}
