// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use super::render::Render;
use crate::element::Output;
use crate::error::Result;

/// Attribute blocks, one per element, separated by `---`
pub struct DescribeOutput<E> {
    elems: Vec<E>,
}

impl<E: Render> DescribeOutput<E> {
    pub fn new() -> Self {
        Self { elems: Vec::new() }
    }

    pub fn render(&self) -> String {
        self.elems
            .iter()
            .map(|elem| {
                let attrs = elem.describe();
                let width = attrs.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
                attrs
                    .iter()
                    .map(|(label, value)| format!("{:<width$} {}\n", format!("{}:", label), value))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("---\n")
    }
}

impl<E: Render> Default for DescribeOutput<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Render + Send> Output<E> for DescribeOutput<E> {
    fn add(&mut self, elem: E) -> Result<()> {
        self.elems.push(elem);
        Ok(())
    }

    fn out(&mut self) -> Result<()> {
        print!("{}", self.render());
        Ok(())
    }
}
