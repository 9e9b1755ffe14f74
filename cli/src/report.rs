// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io;

/// Label/value rows, written with the labels padded to one column.
#[derive(Debug, Default)]
pub struct Report {
    rows: Vec<(&'static str, String)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, label: &'static str, value: impl ToString) -> Self {
        self.rows.push((label, value.to_string()));
        self
    }

    /// Add a row for an optional duration component, `-` when unset.
    pub fn component(self, label: &'static str, value: Option<u32>) -> Self {
        match value {
            Some(value) => self.row(label, value),
            None => self.row(label, "-"),
        }
    }

    pub fn write(&self, out: &mut impl io::Write) -> io::Result<()> {
        let width = self.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(out, "{label:<width$}  {value}")?;
        }
        Ok(())
    }
}
