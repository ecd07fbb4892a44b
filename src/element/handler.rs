// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Argument resolution
//!
//! Turns the element names given on the command line into a stream of
//! elements pushed into an [`Output`]. Three strategies exist:
//!
//! - bulk: no names (and no default) or exactly `all`; every element that
//!   passes the filter, in source order
//! - direct: only exact names; one point lookup per name, unfiltered
//! - scan: at least one name is a pattern; the source is enumerated once and
//!   every pattern is matched against that enumeration, while exact names in
//!   the same list are still looked up directly (and filtered)
//!
//! Bulk and direct resolution finish with `close` then `out`. Scan mode only
//! calls `out`.
// TODO: decide whether scan mode should also call `close`; table sinks stay
// unsorted in that path today.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::Options;
use super::output::Output;
use crate::data::{BoxIter, ElemIterator, IndexedIterator};
use crate::error::{Error, NotFoundOrigin, Result};

/// The literal argument selecting every element
pub const ALL: &str = "all";

/// Capabilities a resource type provides to the resolver
#[async_trait]
pub trait Source: Send + Sync {
    type Elem: Clone + Send + Sync + 'static;

    /// Name to resolve when no argument was given
    fn get_default(&self, opts: &Options) -> Option<String> {
        opts.default.clone()
    }

    /// Whether resolving `name` needs a full enumeration
    fn require_scan(&self, _name: &str) -> bool {
        false
    }

    fn match_name(&self, elem: &Self::Elem, name: &str) -> Result<bool>;

    /// Point lookup, `None` if the source has no such element
    async fn get(&self, name: &str) -> Result<Option<Self::Elem>>;

    /// Full enumeration of the source
    async fn iterator(&self, opts: &Options) -> Result<BoxIter<Self::Elem>>;

    /// Global filter predicate (project, seed, profile scoping)
    fn matches(&self, elem: &Self::Elem, opts: &Options) -> Result<bool>;
}

/// Drives one [`Source`] into one [`Output`]
pub struct ElementHandler<S, O> {
    source: S,
    output: O,
}

impl<S, O> ElementHandler<S, O>
where
    S: Source,
    O: Output<S::Elem>,
{
    pub fn new(source: S, output: O) -> Self {
        Self { source, output }
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Resolve a list of names (possibly empty) into the output
    pub async fn resolve(&mut self, args: &[String], opts: &Options) -> Result<()> {
        let mut names = args.to_vec();
        if names.is_empty()
            && let Some(default) = self.source.get_default(opts)
        {
            debug!(default = %default, "No element given, using default");
            names.push(default);
        }

        if names.is_empty() || (names.len() == 1 && names[0] == ALL) {
            self.resolve_all(opts).await
        } else {
            self.resolve_dedicated(&names, opts).await
        }
    }

    /// Resolve exactly one name, falling back to the default selection
    ///
    /// Unlike [`resolve`](Self::resolve), having nothing to resolve is an
    /// error rather than a request for every element.
    pub async fn resolve_single(&mut self, name: Option<&str>, opts: &Options) -> Result<()> {
        let name = name
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| self.source.get_default(opts))
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Selection("no element selected".to_string()))?;

        self.resolve_dedicated(&[name], opts).await
    }

    async fn resolve_all(&mut self, opts: &Options) -> Result<()> {
        debug!("Bulk resolution");
        let mut elems = self.source.iterator(opts).await?;
        let mut added = 0usize;

        while elems.has_next() {
            let elem = elems.next()?;
            if self.source.matches(&elem, opts)? {
                self.output.add(elem)?;
                added += 1;
            }
        }

        debug!(added, "Bulk resolution complete");
        self.output.close()?;
        self.output.out()
    }

    async fn resolve_dedicated(&mut self, names: &[String], opts: &Options) -> Result<()> {
        if names.iter().any(|n| self.source.require_scan(n)) {
            return self.resolve_scan(names, opts).await;
        }

        debug!(count = names.len(), "Direct resolution");
        for name in names {
            let elem = self.lookup(name).await?;
            self.output.add(elem)?;
        }

        self.output.close()?;
        self.output.out()
    }

    async fn resolve_scan(&mut self, names: &[String], opts: &Options) -> Result<()> {
        let all = Arc::new(drain(self.source.iterator(opts).await?)?);
        debug!(
            count = names.len(),
            scanned = all.len(),
            "Scan resolution"
        );

        for name in names {
            if !self.source.require_scan(name) {
                let elem = self.lookup(name).await?;
                if self.source.matches(&elem, opts)? {
                    self.output.add(elem)?;
                }
                continue;
            }

            let mut found = false;
            let mut elems = IndexedIterator::new(Arc::clone(&all));
            while elems.has_next() {
                let elem = elems.next()?;
                if self.source.matches(&elem, opts)? && self.source.match_name(&elem, name)? {
                    self.output.add(elem)?;
                    found = true;
                }
            }
            if !found {
                return Err(Error::not_found(name, NotFoundOrigin::Resolve));
            }
        }

        self.output.out()
    }

    async fn lookup(&self, name: &str) -> Result<S::Elem> {
        self.source
            .get(name)
            .await?
            .ok_or_else(|| Error::not_found(name, NotFoundOrigin::Resolve))
    }
}

fn drain<T>(mut elems: BoxIter<T>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while elems.has_next() {
        items.push(elems.next()?);
    }
    Ok(items)
}
