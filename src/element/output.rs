// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Output sinks fed by the resolver

use crate::error::{Error, Result};

/// Receives resolved elements one at a time and renders them
///
/// The resolver calls `add` for every selected element, then `close` (bulk
/// and direct resolution only) to finalize, then `out` to emit.
pub trait Output<E>: Send {
    fn add(&mut self, elem: E) -> Result<()>;

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn out(&mut self) -> Result<()>;
}

impl<E, O: Output<E> + ?Sized> Output<E> for Box<O> {
    fn add(&mut self, elem: E) -> Result<()> {
        (**self).add(elem)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn out(&mut self) -> Result<()> {
        (**self).out()
    }
}

/// Collects every added element in arrival order
#[cfg(test)]
#[derive(Debug)]
pub struct ElementOutput<E> {
    elems: Vec<E>,
}

#[cfg(test)]
impl<E> ElementOutput<E> {
    pub fn new() -> Self {
        Self { elems: Vec::new() }
    }

    pub fn into_elems(self) -> Vec<E> {
        self.elems
    }
}

#[cfg(test)]
impl<E> Default for ElementOutput<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<E: Send> Output<E> for ElementOutput<E> {
    fn add(&mut self, elem: E) -> Result<()> {
        self.elems.push(elem);
        Ok(())
    }

    fn out(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Accepts exactly one element; a second `add` is a selection error
///
/// Used by commands that act on a single element (select, kubeconfig).
#[derive(Debug)]
pub struct SingleElementOutput<E> {
    elem: Option<E>,
}

impl<E> SingleElementOutput<E> {
    pub fn new() -> Self {
        Self { elem: None }
    }

    #[cfg(test)]
    pub fn elem(&self) -> Option<&E> {
        self.elem.as_ref()
    }

    pub fn into_elem(self) -> Option<E> {
        self.elem
    }
}

impl<E> Default for SingleElementOutput<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Send> Output<E> for SingleElementOutput<E> {
    fn add(&mut self, elem: E) -> Result<()> {
        if self.elem.is_some() {
            return Err(Error::MultipleSelection);
        }
        self.elem = Some(elem);
        Ok(())
    }

    fn out(&mut self) -> Result<()> {
        Ok(())
    }
}
