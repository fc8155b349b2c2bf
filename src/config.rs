//! Configuration types for feeds and chat builds.
//!
//! These are plain structs with builder methods so library users never need
//! the CLI layer.
//!
//! - [`FeedConfig`] - how export files are read
//! - [`BuildConfig`] - how events are classified
//!
//! # Example
//!
//! ```rust
//! use chatdemux::config::{BuildConfig, FeedConfig};
//! use chatdemux::tokens::Token;
//!
//! let feed = FeedConfig::new().with_fix_encoding(false);
//! assert!(!feed.fix_encoding);
//!
//! // Exports from a 24-hour locale write plan times as "14:00".
//! let build = BuildConfig::new().with_token_pattern(Token::PlanTime, r"(\d{1,2}:\d{2})");
//! assert_eq!(build.token_patterns.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::tokens::{Token, TokenMatcher};

/// Configuration for reading Messenger export files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Repair Meta's double-encoded text (default: true)
    ///
    /// The export writes every UTF-8 byte as its own code point, so
    /// "Château" arrives as "ChÃ¢teau".
    pub fix_encoding: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { fix_encoding: true }
    }
}

impl FeedConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to repair double-encoded text.
    #[must_use]
    pub fn with_fix_encoding(mut self, fix: bool) -> Self {
        self.fix_encoding = fix;
        self
    }
}

/// Configuration for one chat build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Placeholder overrides, applied in order before the first event.
    ///
    /// Each pattern must contain exactly one capturing group.
    pub token_patterns: Vec<(Token, String)>,
}

impl BuildConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the regex a placeholder expands to.
    #[must_use]
    pub fn with_token_pattern(mut self, token: Token, pattern: impl Into<String>) -> Self {
        self.token_patterns.push((token, pattern.into()));
        self
    }

    /// Creates a matcher with every override applied.
    pub fn matcher(&self) -> Result<TokenMatcher, PatternError> {
        let mut matcher = TokenMatcher::new();
        for (token, pattern) in &self.token_patterns {
            matcher.set_token_pattern(*token, pattern.as_str())?;
        }
        Ok(matcher)
    }
}
