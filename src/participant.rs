//! Participant identity.
//!
//! A [`Participant`] is a handle: clones share one allocation, and two handles
//! are equal only if they point at the same allocation. Handles are handed out
//! by a [`ParticipantRegistry`], which keeps exactly one allocation per display
//! name, so comparing handles compares people.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Serialize, Serializer};

/// Name given to the shared unknown persona.
pub const UNKNOWN_PARTICIPANT_NAME: &str = "Facebook User";

/// Names the exporter writes in place of an account it cannot attribute.
/// Compared case-insensitively.
const PLACEHOLDER_NAMES: &[&str] = &["", "a participant", "a contact", "facebook user"];

/// Returns `true` if `name` is one of the exporter's stand-ins for an
/// unattributable account.
pub fn is_placeholder_name(name: &str) -> bool {
    PLACEHOLDER_NAMES
        .iter()
        .any(|placeholder| placeholder.eq_ignore_ascii_case(name))
}

#[derive(Debug)]
struct Identity {
    name: String,
    is_owner: bool,
}

/// One member of a conversation.
///
/// # Example
///
/// ```rust
/// use chatdemux::participant::ParticipantRegistry;
///
/// let mut registry = ParticipantRegistry::new("Jason");
/// let milly = registry.request("Milly");
/// assert_eq!(milly, registry.request("Milly"));
/// assert_ne!(milly, registry.request_owner());
/// assert!(registry.request("Jason").is_owner());
/// ```
#[derive(Clone)]
pub struct Participant(Rc<Identity>);

impl Participant {
    fn new(name: impl Into<String>, is_owner: bool) -> Self {
        Self(Rc::new(Identity {
            name: name.into(),
            is_owner,
        }))
    }

    /// Returns the account name, or `"Facebook User"` for the unknown persona.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns `true` if this participant downloaded the archive.
    pub fn is_owner(&self) -> bool {
        self.0.is_owner
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Participant").field(&self.0.name).finish()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl Serialize for Participant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Hands out unique [`Participant`] handles during one chat build.
///
/// Every request is logged so that only people who actually appear are
/// reported as participants; in particular the unknown persona is only listed
/// if something was attributed to it.
#[derive(Debug)]
pub struct ParticipantRegistry {
    owner: Participant,
    unknown: Participant,
    by_name: HashMap<String, Participant>,
    // First-request order, one entry per distinct participant.
    order: Vec<Participant>,
}

impl ParticipantRegistry {
    /// Creates a registry for an archive downloaded by `owner_name`.
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner: Participant::new(owner_name, true),
            unknown: Participant::new(UNKNOWN_PARTICIPANT_NAME, false),
            by_name: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the participant for `name`, creating it on first request.
    ///
    /// Placeholder names all resolve to the shared unknown persona, and the
    /// owner's name resolves to the owner.
    pub fn request(&mut self, name: &str) -> Participant {
        if let Some(participant) = self.by_name.get(name) {
            return participant.clone();
        }

        let participant = if name == self.owner.name() {
            self.owner.clone()
        } else if is_placeholder_name(name) {
            self.unknown.clone()
        } else {
            Participant::new(name, false)
        };

        if !self.order.contains(&participant) {
            self.order.push(participant.clone());
        }
        self.by_name.insert(name.to_string(), participant.clone());
        participant
    }

    /// Returns the shared unknown persona, marking it as present.
    pub fn request_unknown(&mut self) -> Participant {
        self.request(UNKNOWN_PARTICIPANT_NAME)
    }

    /// Returns the archive owner, marking them as present.
    pub fn request_owner(&mut self) -> Participant {
        let name = self.owner.name().to_string();
        self.request(&name)
    }

    /// Returns the unknown persona without marking it as present.
    pub fn unknown(&self) -> &Participant {
        &self.unknown
    }

    /// Returns every distinct participant requested so far, in the order they
    /// were first requested.
    pub fn all(&self) -> &[Participant] {
        &self.order
    }

    /// Returns `true` if something has been attributed to the unknown persona.
    pub fn unknown_was_requested(&self) -> bool {
        self.order.contains(&self.unknown)
    }

    /// Consumes the registry, returning the participant list and the unknown
    /// persona.
    pub fn into_parts(self) -> (Vec<Participant>, Participant) {
        (self.order, self.unknown)
    }
}
