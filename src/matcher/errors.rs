//! Matcher error types
//!
//! Both variants are fatal: an unreliable annotation is worse than none,
//! so the whole run aborts rather than emitting a guess.

use thiserror::Error;

/// Result type for matcher operations
pub type MatchResult<T> = Result<T, MatchError>;

/// Fatal matching faults
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatchError {
    /// More than one implicit join-key candidate matched the statement
    #[error("implicit join condition is ambiguous; candidates: {}", candidates.join(", "))]
    AmbiguousJoin { candidates: Vec<String> },

    /// The predicate tree contains a shape the matcher does not understand
    #[error("unsupported predicate shape: {0}")]
    UnsupportedPredicate(&'static str),
}
