// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Lazy element sequences
//!
//! [`ElemIterator`] is the explicit `has_next`/`next` cursor the resolution
//! framework walks. Unlike `std::iter::Iterator`, stepping past the end is an
//! error ([`Error::Exhausted`]) rather than a silent `None`.
//!
//! - [`Mapped`] applies a transform per element without materializing
//! - [`IndexedIterator`] walks an [`IndexedAccess`] and can be restarted
//! - [`MapEntry`] sequences project to their values via [`values`]

use std::sync::Arc;

use crate::error::{Error, Result};

/// Cursor over a finite or lazily produced sequence of elements
pub trait ElemIterator: Send {
    type Item;

    fn has_next(&self) -> bool;

    /// Advance and return the next element, failing once exhausted
    fn next(&mut self) -> Result<Self::Item>;

    /// Drain the remaining elements into a vector
    fn collect_all(mut self) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        let mut items = Vec::new();
        while self.has_next() {
            match self.next() {
                Ok(item) => items.push(item),
                Err(_) => break,
            }
        }
        items
    }

    /// Bridge into a standard iterator
    fn into_std(self) -> StdIter<Self>
    where
        Self: Sized,
    {
        StdIter { inner: self }
    }
}

impl<I: ElemIterator + ?Sized> ElemIterator for Box<I> {
    type Item = I::Item;

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<Self::Item> {
        (**self).next()
    }
}

/// Type-erased element iterator as handed out by sources
pub type BoxIter<T> = Box<dyn ElemIterator<Item = T>>;

/// Adapter from [`ElemIterator`] to `std::iter::Iterator`
pub struct StdIter<I> {
    inner: I,
}

impl<I: ElemIterator> Iterator for StdIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.has_next() {
            self.inner.next().ok()
        } else {
            None
        }
    }
}

/// Lazily applies `f` to every element of `source`
///
/// Single pass: restarting requires a restartable source.
pub struct Mapped<I, F> {
    source: I,
    f: F,
}

impl<I, F> Mapped<I, F> {
    pub fn new(source: I, f: F) -> Self {
        Self { source, f }
    }
}

impl<I, F, U> ElemIterator for Mapped<I, F>
where
    I: ElemIterator,
    F: FnMut(I::Item) -> U + Send,
{
    type Item = U;

    fn has_next(&self) -> bool {
        self.source.has_next()
    }

    fn next(&mut self) -> Result<U> {
        self.source.next().map(&mut self.f)
    }
}

/// Random access to a finite ordered collection
pub trait IndexedAccess: Send + Sync {
    type Item;

    fn len(&self) -> usize;

    /// Element at `index`, `None` when out of range
    fn at(&self, index: usize) -> Option<Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> IndexedAccess for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn at(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

/// Restartable iterator over shared indexed data
///
/// Only the position is owned; the collection stays shared, so any number
/// of independent passes can be made without re-querying the source.
pub struct IndexedIterator<A> {
    access: Arc<A>,
    pos: usize,
}

impl<A: IndexedAccess> IndexedIterator<A> {
    pub fn new(access: Arc<A>) -> Self {
        Self { access, pos: 0 }
    }

    /// Restart from the first element
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

impl<A: IndexedAccess> ElemIterator for IndexedIterator<A> {
    type Item = A::Item;

    fn has_next(&self) -> bool {
        self.pos < self.access.len()
    }

    fn next(&mut self) -> Result<A::Item> {
        let item = self.access.at(self.pos).ok_or(Error::Exhausted)?;
        self.pos += 1;
        Ok(item)
    }
}

/// Iterator over an owned vector
pub type SliceIterator<T> = IndexedIterator<Vec<T>>;

pub fn slice_iter<T: Clone + Send + Sync>(items: Vec<T>) -> SliceIterator<T> {
    IndexedIterator::new(Arc::new(items))
}

/// Key/value pair taken from a map snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry<K, V> {
    pub key: K,
    pub value: V,
}

/// Iterator over the values of a map snapshot
pub type ValueIterator<K, V> = Mapped<SliceIterator<MapEntry<K, V>>, fn(MapEntry<K, V>) -> V>;

/// Project a sequence of map entries onto their values
pub fn values<K, V>(entries: SliceIterator<MapEntry<K, V>>) -> ValueIterator<K, V>
where
    K: Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    Mapped::new(entries, entry_value as fn(MapEntry<K, V>) -> V)
}

fn entry_value<K, V>(entry: MapEntry<K, V>) -> V {
    entry.value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_iter_walks_in_order() {
        let mut it = slice_iter(vec!["a", "b", "c"]);
        assert!(it.has_next());
        assert_eq!(it.next().unwrap(), "a");
        assert_eq!(it.next().unwrap(), "b");
        assert_eq!(it.next().unwrap(), "c");
        assert!(!it.has_next());
    }

    #[test]
    fn test_next_past_end_is_error() {
        let mut it = slice_iter(vec![1]);
        it.next().unwrap();
        assert!(matches!(it.next(), Err(Error::Exhausted)));
    }

    #[test]
    fn test_empty_slice() {
        let it = slice_iter(Vec::<u32>::new());
        assert!(!it.has_next());
        assert!(it.collect_all().is_empty());
    }

    #[test]
    fn test_indexed_iterator_restart() {
        let data = Arc::new(vec![10, 20]);
        let mut it = IndexedIterator::new(Arc::clone(&data));
        assert_eq!(it.next().unwrap(), 10);
        assert_eq!(it.next().unwrap(), 20);
        assert!(!it.has_next());

        it.reset();
        assert_eq!(it.next().unwrap(), 10);

        // A second iterator over the same data is independent
        let other = IndexedIterator::new(data);
        assert_eq!(other.collect_all(), vec![10, 20]);
    }

    #[test]
    fn test_mapped_is_lazy() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut it = Mapped::new(slice_iter(vec![1, 2, 3]), move |x: i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            x * 2
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(it.next().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(it.collect_all(), vec![4, 6]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_mapped_propagates_exhaustion() {
        let mut it = Mapped::new(slice_iter(Vec::<i32>::new()), |x: i32| x);
        assert!(!it.has_next());
        assert!(matches!(it.next(), Err(Error::Exhausted)));
    }

    #[test]
    fn test_values_projects_map_entries() {
        let entries = vec![
            MapEntry {
                key: "a".to_string(),
                value: 1,
            },
            MapEntry {
                key: "b".to_string(),
                value: 2,
            },
        ];
        assert_eq!(values(slice_iter(entries)).collect_all(), vec![1, 2]);
    }

    #[test]
    fn test_boxed_and_std_bridge() {
        let boxed: BoxIter<&str> = Box::new(slice_iter(vec!["x", "y"]));
        let collected: Vec<_> = boxed.into_std().collect();
        assert_eq!(collected, vec!["x", "y"]);
    }
}
