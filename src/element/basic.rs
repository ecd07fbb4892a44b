// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! List-backed sources
//!
//! For resource types that are only ever listed as a whole, a
//! [`ListAdapter`] supplies the listing and a name per element, and
//! [`BasicSource`] derives the remaining [`Source`] capabilities from it.
//! The first listing is kept as shared indexed data; later enumerations are
//! fresh iterators over it.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::Options;
use super::handler::Source;
use super::pattern::{glob_match, is_pattern};
use crate::data::{BoxIter, IndexedIterator};
use crate::error::Result;

#[async_trait]
pub trait ListAdapter: Send + Sync {
    type Elem: Clone + Send + Sync + 'static;

    async fn get_all(&self, opts: &Options) -> Result<Vec<Self::Elem>>;

    /// Name used for lookups and pattern matching
    fn name<'a>(&self, elem: &'a Self::Elem) -> &'a str;

    fn filter(&self, _elem: &Self::Elem, _opts: &Options) -> Result<bool> {
        Ok(true)
    }
}

pub struct BasicSource<A: ListAdapter> {
    adapter: A,
    elems: Mutex<Option<Arc<Vec<A::Elem>>>>,
}

impl<A: ListAdapter> BasicSource<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            elems: Mutex::new(None),
        }
    }

    async fn load(&self, opts: &Options) -> Result<Arc<Vec<A::Elem>>> {
        let mut elems = self.elems.lock().await;
        if let Some(loaded) = elems.as_ref() {
            return Ok(Arc::clone(loaded));
        }
        let loaded = Arc::new(self.adapter.get_all(opts).await?);
        debug!(count = loaded.len(), "Loaded element list");
        *elems = Some(Arc::clone(&loaded));
        Ok(loaded)
    }
}

#[async_trait]
impl<A: ListAdapter> Source for BasicSource<A> {
    type Elem = A::Elem;

    fn require_scan(&self, name: &str) -> bool {
        is_pattern(name)
    }

    fn match_name(&self, elem: &A::Elem, name: &str) -> Result<bool> {
        Ok(glob_match(name, self.adapter.name(elem)))
    }

    async fn get(&self, name: &str) -> Result<Option<A::Elem>> {
        let elems = self.load(&Options::default()).await?;
        Ok(elems
            .iter()
            .find(|e| self.adapter.name(e) == name)
            .cloned())
    }

    async fn iterator(&self, opts: &Options) -> Result<BoxIter<A::Elem>> {
        Ok(Box::new(IndexedIterator::new(self.load(opts).await?)))
    }

    fn matches(&self, elem: &A::Elem, opts: &Options) -> Result<bool> {
        self.adapter.filter(elem, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ElemIterator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        names: Vec<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListAdapter for Fixed {
        type Elem = String;

        async fn get_all(&self, _opts: &Options) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.names.clone())
        }

        fn name<'a>(&self, elem: &'a String) -> &'a str {
            elem
        }

        fn filter(&self, elem: &String, _opts: &Options) -> Result<bool> {
            Ok(elem != "hidden")
        }
    }

    fn source(names: &[&str]) -> BasicSource<Fixed> {
        BasicSource::new(Fixed {
            names: names.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_list_is_memoized() {
        let src = source(&["a", "b"]);
        let first = src.iterator(&Options::default()).await.unwrap();
        let second = src.iterator(&Options::default()).await.unwrap();
        assert_eq!(first.collect_all(), vec!["a", "b"]);
        assert_eq!(second.collect_all(), vec!["a", "b"]);
        assert!(src.get("a").await.unwrap().is_some());
        assert_eq!(src.adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let src = source(&["a", "b"]);
        assert_eq!(src.get("b").await.unwrap().as_deref(), Some("b"));
        assert!(src.get("c").await.unwrap().is_none());
    }

    #[test]
    fn test_capabilities() {
        let src = source(&[]);
        assert!(src.require_scan("a*"));
        assert!(!src.require_scan("a"));
        assert!(src.match_name(&"abc".to_string(), "a*").unwrap());
        assert!(!src.matches(&"hidden".to_string(), &Options::default()).unwrap());
    }
}
