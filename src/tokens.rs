//! Token patterns: the text-matching primitive behind every rule.
//!
//! A rule describes the sentences it recognises as a [`Pattern`]: a sequence
//! of regex literals and named placeholders ([`Token`]s). The [`TokenMatcher`]
//! assembles the sequence into one anchored regex, caches it under the
//! pattern's id and hands back the text each placeholder captured.
//!
//! ```rust
//! use chatdemux::tokens::{Pattern, Segment::{Lit, Tok}, Token, TokenMatcher};
//!
//! const JOINED: Pattern = Pattern::new(
//!     "doc_joined",
//!     &[Tok(Token::SenderAlias), Lit(r" joined the call\.")],
//! );
//! const RENAMED: Pattern = Pattern::new(
//!     "doc_renamed",
//!     &[Tok(Token::SenderAlias), Lit(" named the group "), Tok(Token::Anything)],
//! );
//!
//! let mut matcher = TokenMatcher::new();
//! let caps = matcher.matches(&JOINED, "Ann joined the call.")?.unwrap();
//! assert_eq!(caps.value(Token::SenderAlias), "Ann");
//!
//! // The export appends a period after the group name; it is not captured.
//! let caps = matcher.matches(&RENAMED, "Ann named the group Hikers.")?.unwrap();
//! assert_eq!(caps.value(Token::Anything), "Hikers");
//! # Ok::<(), chatdemux::PatternError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PatternError;

/// Named placeholders that may appear in a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// Name of a participant other than the sender.
    ParticipantName,
    /// How the export refers to the sender ("You", or their name).
    SenderAlias,
    /// First name of a participant.
    ParticipantFirstName,
    /// Free text.
    Anything,
    /// Date and time of a plan, e.g. "Sat, Aug 5 at 12 PM".
    PlanDateTime,
    /// Title of a plan.
    PlanTitle,
    /// Hour of a plan, e.g. "12 PM".
    PlanTime,
    /// Title of a poll.
    PollName,
    /// One option of a poll.
    PollOption,
    /// A decimal number.
    Number,
    /// An emoji.
    Emoji,
    /// Name of an app or game.
    AppName,
    /// A score in an app or game.
    AppScore,
}

impl Token {
    /// Returns every token.
    pub fn all() -> &'static [Token] {
        &[
            Token::ParticipantName,
            Token::SenderAlias,
            Token::ParticipantFirstName,
            Token::Anything,
            Token::PlanDateTime,
            Token::PlanTitle,
            Token::PlanTime,
            Token::PollName,
            Token::PollOption,
            Token::Number,
            Token::Emoji,
            Token::AppName,
            Token::AppScore,
        ]
    }

    /// Returns the regex this token expands to before any override.
    pub fn default_pattern(self) -> &'static str {
        match self {
            Token::PlanTime => r"(\d{1,2} (?:AM|PM))",
            Token::Number => r"(\d+)",
            Token::AppScore => r"(\S+)",
            _ => "(.*)",
        }
    }
}

/// One element of a [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Regex text matched verbatim. Must not contain an unescaped `.` or a
    /// capturing group; non-capturing `(?:...)` groups are fine.
    Lit(&'static str),
    /// A placeholder whose match is captured.
    Tok(Token),
}

/// A sequence of segments identified by a stable id.
///
/// The id is the cache key for the compiled regex, so two patterns with
/// different segments must never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Stable, unique identifier.
    pub id: &'static str,
    /// Literals and placeholders, in order.
    pub segments: &'static [Segment],
}

impl Pattern {
    /// Creates a pattern.
    pub const fn new(id: &'static str, segments: &'static [Segment]) -> Self {
        Self { id, segments }
    }

    /// Returns `true` if the last segment is a placeholder.
    pub fn ends_with_token(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Tok(_)))
    }

    /// Iterates over the placeholders in order of appearance.
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Tok(token) => Some(*token),
            Segment::Lit(_) => None,
        })
    }

    /// Iterates over the literal segments in order of appearance.
    pub fn literals(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Lit(literal) => Some(*literal),
            Segment::Tok(_) => None,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments {
            match segment {
                Segment::Lit(text) => f.write_str(text)?,
                Segment::Tok(token) => write!(f, "{{{:?}}}", token)?,
            }
        }
        Ok(())
    }
}

/// What a placeholder captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// The token appeared once in the pattern.
    Single(String),
    /// The token appeared several times; captures in order of appearance.
    Multiple(Vec<String>),
}

impl Capture {
    /// Returns the first (or only) captured string.
    pub fn first(&self) -> &str {
        match self {
            Capture::Single(value) => value,
            Capture::Multiple(values) => values.first().map_or("", String::as_str),
        }
    }

    /// Returns every captured string in order.
    pub fn all(&self) -> Vec<&str> {
        match self {
            Capture::Single(value) => vec![value.as_str()],
            Capture::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Capture::Single(first) => {
                let first = std::mem::take(first);
                *self = Capture::Multiple(vec![first, value]);
            }
            Capture::Multiple(values) => values.push(value),
        }
    }
}

/// Placeholder captures from one successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    inner: HashMap<Token, Capture>,
}

impl Captures {
    /// Returns the capture for `token`, if the token was part of the pattern.
    pub fn get(&self, token: Token) -> Option<&Capture> {
        self.inner.get(&token)
    }

    /// Returns the first string captured for `token`.
    ///
    /// Tokens that are part of the matched pattern always capture, so this
    /// only yields `""` for tokens the pattern does not contain.
    pub fn value(&self, token: Token) -> &str {
        self.inner.get(&token).map_or("", Capture::first)
    }

    /// Number of distinct tokens captured.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn insert(&mut self, token: Token, value: String) {
        match self.inner.get_mut(&token) {
            Some(existing) => existing.push(value),
            None => {
                self.inner.insert(token, Capture::Single(value));
            }
        }
    }
}

/// Characters the export may append to a generated sentence.
fn is_terminal_punctuation(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Rejects literal text that would break capture alignment or is almost
/// certainly a typo.
fn validate_literal(id: &'static str, literal: &str) -> Result<(), PatternError> {
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '.' => {
                return Err(PatternError::UnescapedDot {
                    id,
                    literal: literal.to_string(),
                });
            }
            '(' if opens_capturing_group(chars.clone()) => {
                return Err(PatternError::CapturingGroup {
                    id,
                    literal: literal.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Whether the text after a `(` opens a capturing group, named ones included.
fn opens_capturing_group(mut rest: impl Iterator<Item = char>) -> bool {
    if rest.next() != Some('?') {
        return true;
    }
    match rest.next() {
        Some('P') => rest.next() == Some('<'),
        Some('<') => !matches!(rest.next(), Some('=' | '!')),
        Some('\'') => true,
        _ => false,
    }
}

/// Compiles token sequences and matches text against them.
///
/// Compiled regexes are cached by [`Pattern::id`]. Redefining a token through
/// [`set_token_pattern`](Self::set_token_pattern) drops every cached regex that
/// used it.
#[derive(Debug)]
pub struct TokenMatcher {
    token_patterns: HashMap<Token, String>,
    cache: HashMap<&'static str, Regex>,
    dependents: HashMap<Token, HashSet<&'static str>>,
}

impl Default for TokenMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMatcher {
    /// Creates a matcher with every token at its default pattern.
    pub fn new() -> Self {
        let token_patterns = Token::all()
            .iter()
            .map(|token| (*token, token.default_pattern().to_string()))
            .collect();
        Self {
            token_patterns,
            cache: HashMap::new(),
            dependents: HashMap::new(),
        }
    }

    /// Returns the regex `token` currently expands to.
    pub fn token_pattern(&self, token: Token) -> &str {
        self.token_patterns
            .get(&token)
            .map_or_else(|| token.default_pattern(), String::as_str)
    }

    /// Sets or replaces the regex a token expands to.
    ///
    /// The pattern must contain exactly one capturing group. Cached patterns
    /// that reference `token` are invalidated.
    pub fn set_token_pattern(
        &mut self,
        token: Token,
        pattern: impl Into<String>,
    ) -> Result<(), PatternError> {
        let pattern = pattern.into();
        let groups = Regex::new(&pattern)
            .map_err(|e| PatternError::Regex {
                id: format!("{:?}", token),
                message: e.to_string(),
            })?
            .captures_len()
            - 1;
        if groups != 1 {
            return Err(PatternError::TokenGroupCount { token, groups });
        }

        self.token_patterns.insert(token, pattern);
        if let Some(ids) = self.dependents.remove(&token) {
            debug!(?token, invalidated = ids.len(), "token pattern redefined");
            for id in ids {
                self.cache.remove(id);
            }
        }
        Ok(())
    }

    /// Returns `true` if a compiled regex is cached under `id`.
    pub fn is_cached(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    /// Compiles `pattern` into an anchored regex, reusing the cached one when
    /// available.
    pub fn compile(&mut self, pattern: &Pattern) -> Result<&Regex, PatternError> {
        if !self.cache.contains_key(pattern.id) {
            let regex = self.assemble(pattern)?;
            for token in pattern.tokens() {
                self.dependents.entry(token).or_default().insert(pattern.id);
            }
            self.cache.insert(pattern.id, regex);
        }
        Ok(&self.cache[pattern.id])
    }

    fn assemble(&self, pattern: &Pattern) -> Result<Regex, PatternError> {
        let mut source = String::from("^");
        for segment in pattern.segments {
            match segment {
                Segment::Tok(token) => source.push_str(self.token_pattern(*token)),
                Segment::Lit(literal) => {
                    validate_literal(pattern.id, literal)?;
                    source.push_str(literal);
                }
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::Regex {
            id: pattern.id.to_string(),
            message: e.to_string(),
        })?;
        // Captures are read back by position, one group per token.
        if regex.captures_len() - 1 != pattern.tokens().count() {
            return Err(PatternError::CapturingGroup {
                id: pattern.id,
                literal: pattern.literals().collect(),
            });
        }
        Ok(regex)
    }

    /// Matches `text` against `pattern`.
    ///
    /// The export appends a `.` to generated sentences unless the interpolated
    /// value already ends in terminal punctuation. So when the pattern ends
    /// with a token:
    ///
    /// - text without a trailing `.`, `!` or `?` never matches;
    /// - if the second-to-last character is not terminal punctuation, the
    ///   match is first tried with the last character removed;
    /// - otherwise (or if that fails) the full text is tried.
    ///
    /// This will occasionally drop a real trailing character: a nickname set
    /// to "Don 2." is captured as "Don 2".
    pub fn matches(
        &mut self,
        pattern: &Pattern,
        text: &str,
    ) -> Result<Option<Captures>, PatternError> {
        if pattern.ends_with_token() {
            let mut tail = text.chars().rev();
            match tail.next() {
                Some(last) if is_terminal_punctuation(last) => {
                    if !tail.next().is_some_and(is_terminal_punctuation) {
                        // Terminal punctuation is single-byte.
                        let stripped = &text[..text.len() - 1];
                        if let Some(captures) = self.matches_exact(pattern, stripped)? {
                            return Ok(Some(captures));
                        }
                    }
                }
                _ => return Ok(None),
            }
        }

        self.matches_exact(pattern, text)
    }

    fn matches_exact(
        &mut self,
        pattern: &Pattern,
        text: &str,
    ) -> Result<Option<Captures>, PatternError> {
        let regex = self.compile(pattern)?;
        let Some(found) = regex.captures(text) else {
            return Ok(None);
        };

        let mut captures = Captures::default();
        for (index, token) in pattern.tokens().enumerate() {
            let value = found.get(index + 1).map_or("", |m| m.as_str());
            captures.insert(token, value.to_string());
        }
        Ok(Some(captures))
    }
}

#[cfg(test)]
mod tests {
    use super::Segment::{Lit, Tok};
    use super::*;

    const NICKNAME: Pattern = Pattern::new(
        "test_nickname",
        &[
            Tok(Token::SenderAlias),
            Lit(" set your nickname to "),
            Tok(Token::Anything),
        ],
    );

    const CALL_ENDED: Pattern = Pattern::new("test_call_ended", &[Lit(r"The call ended\.")]);

    #[test]
    fn test_literal_only_match() {
        let mut matcher = TokenMatcher::new();
        let caps = matcher.matches(&CALL_ENDED, "The call ended.").unwrap();
        assert_eq!(caps, Some(Captures::default()));
        assert!(matcher.matches(&CALL_ENDED, "The call ended").unwrap().is_none());
    }

    #[test]
    fn test_anchored_match() {
        let mut matcher = TokenMatcher::new();
        assert!(
            matcher
                .matches(&CALL_ENDED, "Oh. The call ended.")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_single_trailing_dot_is_stripped() {
        let mut matcher = TokenMatcher::new();
        let caps = matcher
            .matches(&NICKNAME, "Joseph set your nickname to John.")
            .unwrap()
            .unwrap();
        assert_eq!(caps.value(Token::SenderAlias), "Joseph");
        assert_eq!(caps.value(Token::Anything), "John");
    }

    #[test]
    fn test_double_terminal_keeps_last_char() {
        let mut matcher = TokenMatcher::new();
        let caps = matcher
            .matches(&NICKNAME, "Joseph set your nickname to Jr..")
            .unwrap()
            .unwrap();
        assert_eq!(caps.value(Token::Anything), "Jr..");

        let caps = matcher
            .matches(&NICKNAME, "Joseph set your nickname to Who?.")
            .unwrap()
            .unwrap();
        assert_eq!(caps.value(Token::Anything), "Who?.");
    }

    #[test]
    fn test_missing_terminal_punctuation_fails() {
        let mut matcher = TokenMatcher::new();
        assert!(
            matcher
                .matches(&NICKNAME, "Joseph set your nickname to John")
                .unwrap()
                .is_none()
        );
        assert!(matcher.matches(&NICKNAME, "").unwrap().is_none());
    }

    #[test]
    fn test_repeated_token_accumulates() {
        const TWO_NAMES: Pattern = Pattern::new(
            "test_two_names",
            &[
                Tok(Token::ParticipantName),
                Lit(" and "),
                Tok(Token::ParticipantName),
                Lit(r" are here\."),
            ],
        );
        let mut matcher = TokenMatcher::new();
        let caps = matcher
            .matches(&TWO_NAMES, "Ann and Bob are here.")
            .unwrap()
            .unwrap();
        assert_eq!(
            caps.get(Token::ParticipantName),
            Some(&Capture::Multiple(vec!["Ann".into(), "Bob".into()]))
        );
        assert_eq!(caps.value(Token::ParticipantName), "Ann");
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn test_unescaped_dot_is_rejected() {
        const BAD: Pattern = Pattern::new("test_bad_dot", &[Lit("The call ended.")]);
        let mut matcher = TokenMatcher::new();
        let err = matcher.matches(&BAD, "The call ended.").unwrap_err();
        assert!(matches!(err, PatternError::UnescapedDot { id: "test_bad_dot", .. }));
    }

    #[test]
    fn test_leading_dot_is_rejected() {
        assert!(validate_literal("x", ".hello").is_err());
        assert!(validate_literal("x", r"\.hello").is_ok());
    }

    #[test]
    fn test_capturing_group_is_rejected() {
        const BAD: Pattern = Pattern::new(
            "test_bad_group",
            &[Tok(Token::SenderAlias), Lit(" cleared (his|her) nickname")],
        );
        let mut matcher = TokenMatcher::new();
        let err = matcher.compile(&BAD).unwrap_err();
        assert!(matches!(err, PatternError::CapturingGroup { .. }));
    }

    #[test]
    fn test_named_group_is_rejected() {
        const NAMED: Pattern = Pattern::new(
            "test_named_group",
            &[
                Lit("(?P<who>Ann|Bob) set your nickname to "),
                Tok(Token::Anything),
            ],
        );
        let mut matcher = TokenMatcher::new();
        let err = matcher
            .matches(&NAMED, "Ann set your nickname to Annie.")
            .unwrap_err();
        assert!(matches!(
            err,
            PatternError::CapturingGroup {
                id: "test_named_group",
                ..
            }
        ));

        assert!(validate_literal("x", "(?<who>Ann) left").is_err());
        assert!(validate_literal("x", "(?'who'Ann) left").is_err());
        assert!(validate_literal("x", "(?i:ann) left").is_ok());
    }

    #[test]
    fn test_non_capturing_group_is_allowed() {
        assert!(validate_literal("x", r" cleared (?:his|her|their) own nickname\.").is_ok());
        assert!(validate_literal("x", r"\(literal paren\)").is_ok());
    }

    #[test]
    fn test_compile_is_cached() {
        let mut matcher = TokenMatcher::new();
        assert!(!matcher.is_cached("test_nickname"));
        matcher.compile(&NICKNAME).unwrap();
        assert!(matcher.is_cached("test_nickname"));
    }

    #[test]
    fn test_set_token_pattern_invalidates_dependents() {
        let mut matcher = TokenMatcher::new();
        matcher.compile(&NICKNAME).unwrap();
        matcher.compile(&CALL_ENDED).unwrap();

        matcher
            .set_token_pattern(Token::Anything, r"([A-Z][a-z]+)")
            .unwrap();
        assert!(!matcher.is_cached("test_nickname"));
        assert!(matcher.is_cached("test_call_ended"));

        assert!(
            matcher
                .matches(&NICKNAME, "Joseph set your nickname to john.")
                .unwrap()
                .is_none()
        );
        assert!(
            matcher
                .matches(&NICKNAME, "Joseph set your nickname to John.")
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_set_token_pattern_requires_one_group() {
        let mut matcher = TokenMatcher::new();
        let err = matcher.set_token_pattern(Token::Number, r"\d+").unwrap_err();
        assert_eq!(
            err,
            PatternError::TokenGroupCount {
                token: Token::Number,
                groups: 0
            }
        );

        let err = matcher
            .set_token_pattern(Token::Number, r"(\d+)-(\d+)")
            .unwrap_err();
        assert!(matches!(err, PatternError::TokenGroupCount { groups: 2, .. }));

        assert!(matcher.set_token_pattern(Token::Number, r"(\d+").is_err());
        assert_eq!(matcher.token_pattern(Token::Number), r"(\d+)");
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(
            NICKNAME.to_string(),
            "{SenderAlias} set your nickname to {Anything}"
        );
    }

    #[test]
    fn test_unicode_capture_with_trailing_dot() {
        let mut matcher = TokenMatcher::new();
        let caps = matcher
            .matches(&NICKNAME, "Иван set your nickname to Ваня 🎉.")
            .unwrap()
            .unwrap();
        assert_eq!(caps.value(Token::SenderAlias), "Иван");
        assert_eq!(caps.value(Token::Anything), "Ваня 🎉");
    }
}
