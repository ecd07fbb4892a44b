// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory memoization of a data source
//!
//! A [`Cache`] sits in front of a [`Cacher`] (something that can list all
//! elements and look up one by key) and remembers what it has seen for the
//! lifetime of one command invocation.
//!
//! Two states matter:
//! - partial: only individually looked-up keys are held, misses go to the source
//! - complete: a full listing succeeded, misses are answered from memory
//!
//! Once complete, a key that is not in the map cannot exist, so `get` fails
//! with "not found" without asking the source again. `reset` returns the
//! cache to the empty partial state.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Display;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::iter::{MapEntry, SliceIterator, ValueIterator, slice_iter, values};
use crate::error::{Error, NotFoundOrigin, Result};

/// Minimal fetch capability a data source exposes to the cache
#[async_trait]
pub trait Cacher: Send + Sync {
    type Key: Ord + Clone + Display + Send + Sync;
    type Elem: Clone + Send + Sync;

    /// List every element the source can produce
    async fn get_all(&self) -> Result<Vec<Self::Elem>>;

    /// Look up one element, `None` if the source does not know it
    async fn get(&self, key: &Self::Key) -> Result<Option<Self::Elem>>;

    fn key(&self, elem: &Self::Elem) -> Self::Key;
}

struct CacheState<K, V> {
    entries: BTreeMap<K, V>,
    complete: bool,
}

impl<K: Ord, V> CacheState<K, V> {
    fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            complete: false,
        }
    }
}

/// Memoizing layer over a [`Cacher`]
///
/// Every operation holds the lock for its whole duration, including the
/// awaited source call, so concurrent callers never issue duplicate listings.
pub struct Cache<C: Cacher> {
    cacher: C,
    state: Mutex<CacheState<C::Key, C::Elem>>,
}

impl<C: Cacher> Cache<C> {
    pub fn new(cacher: C) -> Self {
        Self {
            cacher,
            state: Mutex::new(CacheState::empty()),
        }
    }

    /// Forget everything; the next read goes to the source again
    #[allow(dead_code)]
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = CacheState::empty();
        trace!("Cache reset");
    }

    /// All elements, listing the source once per cache generation
    pub async fn get_all(&self) -> Result<ValueIterator<C::Key, C::Elem>> {
        let mut state = self.state.lock().await;

        if !state.complete {
            let elems = self.cacher.get_all().await?;
            let partial = state.entries.len();
            state.entries = elems
                .into_iter()
                .map(|e| (self.cacher.key(&e), e))
                .collect();
            state.complete = true;
            debug!(
                entries = state.entries.len(),
                replaced_partial = partial,
                "Cache populated from full listing"
            );
        }

        Ok(values(Self::snapshot(&state.entries)))
    }

    /// One element by key
    ///
    /// Misses on a partial cache are fetched and remembered. Misses on a
    /// complete cache are final.
    pub async fn get(&self, key: &C::Key) -> Result<C::Elem> {
        let mut state = self.state.lock().await;

        if let Some(elem) = state.entries.get(key) {
            return Ok(elem.clone());
        }
        if state.complete {
            return Err(Error::not_found(key, NotFoundOrigin::Cache));
        }

        trace!(key = %key, "Cache miss, fetching from source");
        match self.cacher.get(key).await? {
            Some(elem) => {
                state.entries.insert(key.clone(), elem.clone());
                Ok(elem)
            }
            None => Err(Error::not_found(key, NotFoundOrigin::Source)),
        }
    }

    /// Snapshot of the currently held entries; never fetches
    #[allow(dead_code)]
    pub async fn iterator(&self) -> SliceIterator<MapEntry<C::Key, C::Elem>> {
        let state = self.state.lock().await;
        Self::snapshot(&state.entries)
    }

    /// Snapshot of the currently held elements; never fetches
    #[allow(dead_code)]
    pub async fn entries(&self) -> ValueIterator<C::Key, C::Elem> {
        values(self.iterator().await)
    }

    #[allow(dead_code)]
    pub async fn is_complete(&self) -> bool {
        self.state.lock().await.complete
    }

    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    fn snapshot(
        entries: &BTreeMap<C::Key, C::Elem>,
    ) -> SliceIterator<MapEntry<C::Key, C::Elem>> {
        slice_iter(
            entries
                .iter()
                .map(|(key, value)| MapEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        )
    }
}
