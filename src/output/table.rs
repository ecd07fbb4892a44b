// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::borrow::Cow;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};

use super::render::Render;
use crate::element::Output;
use crate::error::Result;

/// Maximum width of free-text columns
const MAX_TEXT_COLUMN_WIDTH: usize = 60;

/// Columns that should have width limits
const TEXT_COLUMNS: &[&str] = &["conditions", "description", "regions"];

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

/// Collects elements and prints them as one table, sorted on close
pub struct TableOutput<E> {
    elems: Vec<E>,
    wide: bool,
}

impl<E: Render> TableOutput<E> {
    pub fn new(wide: bool) -> Self {
        Self {
            elems: Vec::new(),
            wide,
        }
    }

    pub fn render(&self) -> String {
        if self.elems.is_empty() {
            return "(0 rows)".to_string();
        }

        let columns = E::columns(self.wide);
        let truncate: Vec<bool> = columns.iter().map(|c| TEXT_COLUMNS.contains(c)).collect();

        let mut table = Table::new();
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);
        table.set_header(&columns);

        for elem in &self.elems {
            let row = elem.row(self.wide);
            let cells: Vec<Cow<'_, str>> = row
                .iter()
                .zip(&truncate)
                .map(|(val, &limit)| {
                    if limit {
                        truncate_value(val, MAX_TEXT_COLUMN_WIDTH)
                    } else {
                        Cow::Borrowed(val.as_str())
                    }
                })
                .collect();
            table.add_row(cells);
        }

        format!("{}\n({} rows)", table, self.elems.len())
    }
}

impl<E: Render + Send> Output<E> for TableOutput<E> {
    fn add(&mut self, elem: E) -> Result<()> {
        self.elems.push(elem);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.elems.sort_by_cached_key(|e| e.sort_key());
        Ok(())
    }

    fn out(&mut self) -> Result<()> {
        println!("{}", self.render());
        Ok(())
    }
}
