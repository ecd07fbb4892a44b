// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Element resolution and output dispatch
//!
//! Shared by every resource type: a [`Source`] describes how to find
//! elements, an [`Output`] renders them, and [`ElementHandler`] connects the
//! two according to the names given on the command line.

mod basic;
mod handler;
mod output;
pub mod pattern;

pub use basic::{BasicSource, ListAdapter};
pub use handler::{ElementHandler, Source};
pub use output::{Output, SingleElementOutput};

#[cfg(test)]
pub use output::ElementOutput;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

/// Per-invocation options threaded through resolution
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Name resolved when no argument is given
    pub default: Option<String>,
    /// Forwarded to the sink factory
    pub output: OutputFormat,
    /// Forwarded to the filter predicate
    pub scope: FilterScope,
}

/// Global element filters; each present value is a glob
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterScope {
    pub project: Option<String>,
    pub seed: Option<String>,
    pub profile: Option<String>,
    pub infra: Option<String>,
}

impl FilterScope {
    /// Reject filters that can never match anything
    pub fn validate(&self) -> Result<()> {
        let filters = [
            ("--project", &self.project),
            ("--seed", &self.seed),
            ("--profile", &self.profile),
            ("--infra", &self.infra),
        ];
        for (flag, value) in filters {
            if let Some(value) = value
                && value.trim().is_empty()
            {
                return Err(Error::Filter {
                    key: flag.to_string(),
                    reason: "empty pattern".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_scope_validate() {
        let mut scope = FilterScope::default();
        assert!(scope.validate().is_ok());

        scope.seed = Some("aws-*".to_string());
        assert!(scope.validate().is_ok());

        scope.infra = Some(" ".to_string());
        let err = scope.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid filter --infra: empty pattern");
    }
}
