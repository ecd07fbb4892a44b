// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Element sequences and their memoization

mod cache;
mod iter;

pub use cache::{Cache, Cacher};
pub use iter::{BoxIter, ElemIterator, IndexedIterator};

#[cfg(test)]
pub use iter::slice_iter;
