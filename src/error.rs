//! Unified error types for chatdemux.
//!
//! This module provides a single [`DemuxError`] enum covering everything that
//! can go wrong while reading an export or building a chat, plus the narrower
//! [`PatternError`] raised by the token engine when a rule is malformed.
//!
//! # Error Handling Philosophy
//!
//! - **Bad input data** never produces an error during classification: an
//!   event no rule understands becomes
//!   [`MessageKind::Unrecognized`](crate::message::MessageKind::Unrecognized).
//! - **Bad feeds** (unreadable files, invalid JSON) surface as
//!   [`DemuxError::InvalidFeed`], [`DemuxError::Io`] or [`DemuxError::Json`].
//! - **Bad rules** (a literal with an unescaped `.`, a placeholder without
//!   exactly one capturing group) surface as [`DemuxError::Pattern`]. These are
//!   authoring bugs and are not recoverable.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tokens::Token;

/// A specialized [`Result`] type for chatdemux operations.
///
/// # Example
///
/// ```rust
/// use chatdemux::error::Result;
/// use chatdemux::RawEvent;
///
/// fn load() -> Result<Vec<RawEvent>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, DemuxError>;

/// The error type for all chatdemux operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemuxError {
    /// An I/O error occurred.
    ///
    /// This typically happens when writing output files.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A feed could not be constructed from its source.
    ///
    /// This occurs when:
    /// - An export file cannot be opened or is not valid JSON
    /// - A folder feed points at a file, an empty folder, or a folder holding
    ///   files other than `message_<NUM>.json`
    #[error("{message}{}", path.as_ref().map(|p| format!(": {}", p.display())).unwrap_or_default())]
    InvalidFeed {
        /// Description of what's wrong
        message: String,
        /// The file or folder involved, if known
        path: Option<PathBuf>,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A classification rule or placeholder definition is malformed.
    #[error("Malformed rule pattern: {0}")]
    Pattern(#[from] PatternError),

    /// An output format name or extension was not recognised.
    #[error("Unknown output format '{input}'. Expected one of: {expected}")]
    UnknownFormat {
        /// What the caller supplied
        input: String,
        /// Accepted names
        expected: &'static str,
    },
}

/// Errors raised while assembling a token pattern.
///
/// Every variant signals a bug in a rule or placeholder definition rather than
/// in the data being classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    /// A literal segment contains a `.` that is not escaped.
    #[error("literal segment of pattern '{id}' contains an unescaped dot: {literal:?}")]
    UnescapedDot {
        /// Pattern identifier
        id: &'static str,
        /// Offending literal
        literal: String,
    },

    /// A literal segment opens a capturing group, which would shift the
    /// placeholder capture indices.
    #[error("literal segment of pattern '{id}' contains a capturing group: {literal:?}")]
    CapturingGroup {
        /// Pattern identifier
        id: &'static str,
        /// Offending literal
        literal: String,
    },

    /// A placeholder pattern does not contain exactly one capturing group.
    #[error("pattern for token {token:?} must contain exactly one capturing group, found {groups}")]
    TokenGroupCount {
        /// The placeholder being defined
        token: Token,
        /// Number of capturing groups found
        groups: usize,
    },

    /// Two different patterns in one ruleset share an identifier, so they
    /// would overwrite each other in the regex cache.
    #[error("pattern id '{id}' is shared by different token sequences")]
    DuplicateId {
        /// The contested identifier
        id: &'static str,
    },

    /// The assembled pattern is not a valid regular expression.
    #[error("pattern '{id}' failed to compile: {message}")]
    Regex {
        /// Pattern identifier, or the token name for placeholder definitions
        id: String,
        /// Message from the regex engine
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl DemuxError {
    /// Creates an invalid feed error without an underlying cause.
    pub fn invalid_feed(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DemuxError::InvalidFeed {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Creates an invalid feed error wrapping the error that caused it.
    pub fn invalid_feed_from(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DemuxError::InvalidFeed {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    /// Creates an unknown output format error.
    pub fn unknown_format(input: impl Into<String>) -> Self {
        DemuxError::UnknownFormat {
            input: input.into(),
            expected: "summary, json, jsonl, csv",
        }
    }

    /// Returns `true` if this error came from reading a feed.
    pub fn is_feed_error(&self) -> bool {
        matches!(self, DemuxError::InvalidFeed { .. })
    }

    /// Returns `true` if this error signals a malformed rule definition.
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, DemuxError::Pattern(_))
    }

    /// Returns the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            DemuxError::InvalidFeed { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_feed_display_includes_path() {
        let err = DemuxError::invalid_feed("Could not create feed from empty folder", "chats/x");
        assert_eq!(
            err.to_string(),
            "Could not create feed from empty folder: chats/x"
        );
        assert!(err.is_feed_error());
        assert_eq!(err.path(), Some(&PathBuf::from("chats/x")));
    }

    #[test]
    fn test_invalid_feed_from_keeps_source() {
        use std::error::Error as _;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = DemuxError::invalid_feed_from(
            "Could not read json stream from file",
            Some(PathBuf::from("a.json")),
            io_err,
        );
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Could not read json stream from file"));
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: DemuxError = PatternError::UnescapedDot {
            id: "call_end",
            literal: "The call ended.".into(),
        }
        .into();
        assert!(err.is_pattern_error());
        assert!(err.to_string().contains("unescaped dot"));
    }

    #[test]
    fn test_unknown_format() {
        let err = DemuxError::unknown_format("xml");
        assert!(err.to_string().contains("'xml'"));
        assert!(err.to_string().contains("jsonl"));
    }
}
