// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for element resolution
//!
//! Everything below the command layer (iterators, caches, sources, sinks)
//! reports failures through [`Error`]. Commands and `main` wrap these in
//! `anyhow` with additional context.

use std::fmt;

/// Result alias used by the resolution framework
pub type Result<T> = std::result::Result<T, Error>;

/// Where a "not found" condition was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundOrigin {
    /// A complete cache was asked for a key it does not hold
    Cache,
    /// The data source answered a point lookup with nothing
    Source,
    /// A resolution argument matched no element
    Resolve,
}

impl fmt::Display for NotFoundOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundOrigin::Cache => write!(f, "cache"),
            NotFoundOrigin::Source => write!(f, "source"),
            NotFoundOrigin::Resolve => write!(f, "resolve"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No argument given and no default selection available
    #[error("{0}")]
    Selection(String),

    #[error("'{key}' not found")]
    NotFound { key: String, origin: NotFoundOrigin },

    /// The underlying data source failed
    #[error("failed to fetch {what}: {source:#}")]
    Fetch {
        what: String,
        #[source]
        source: anyhow::Error,
    },

    /// A global filter cannot be applied
    #[error("invalid filter {key}: {reason}")]
    Filter { key: String, reason: String },

    /// A name pattern could not be evaluated against an element
    #[error("cannot match '{pattern}': {reason}")]
    Match { pattern: String, reason: String },

    #[error("only one element can be selected, but multiple elements selected/found")]
    MultipleSelection,

    #[error("iterator exhausted")]
    Exhausted,

    /// Rendering or emitting output failed
    #[error("output failed: {0:#}")]
    Output(#[source] anyhow::Error),
}

impl Error {
    pub fn not_found(key: impl fmt::Display, origin: NotFoundOrigin) -> Self {
        Error::NotFound {
            key: key.to_string(),
            origin,
        }
    }

    pub fn fetch(what: impl Into<String>, source: anyhow::Error) -> Self {
        Error::Fetch {
            what: what.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("nomatch*", NotFoundOrigin::Resolve);
        assert_eq!(err.to_string(), "'nomatch*' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_not_found_origins_share_message() {
        let cache = Error::not_found("x", NotFoundOrigin::Cache);
        let resolve = Error::not_found("x", NotFoundOrigin::Resolve);
        assert_eq!(cache.to_string(), resolve.to_string());
    }

    #[test]
    fn test_fetch_keeps_cause_chain() {
        let cause = anyhow::anyhow!("connection refused").context("listing shoots");
        let err = Error::fetch("shoots", cause);
        let msg = err.to_string();
        assert!(msg.contains("failed to fetch shoots"));
        assert!(msg.contains("listing shoots"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_multiple_selection_message() {
        assert!(
            Error::MultipleSelection
                .to_string()
                .contains("only one element can be selected")
        );
    }
}
