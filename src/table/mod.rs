//! In-memory tabular data
//!
//! A [`Table`] is a header row plus rows of string cells, which is all the
//! statistics core needs from a CSV batch. Reading lives in [`reader`],
//! writing in [`writer`].

pub mod reader;
pub mod writer;

pub use reader::{expand_glob, read_csv_file, read_csv_files, read_csv_files_iter, LEGACY_ANSWER_COLUMN};
pub use writer::{write_csv_file, write_csv_string};

use crate::error::{StatsError, StatsResult};

/// Header plus rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table. Rows are padded with empty cells or cut to the header
    /// width; loaders reject overlong rows before this point.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, name: &str) -> StatsResult<usize> {
        self.column_index(name)
            .ok_or_else(|| StatsError::MissingColumn(name.to_string()))
    }

    /// All cells of one column, in row order
    pub fn column(&self, name: &str) -> StatsResult<Vec<&str>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Return a copy with column `from` renamed to `to`.
    ///
    /// If `to` already exists the two columns are merged: cells of `from`
    /// fill the empty cells of `to`, and `from` is removed. Batches mixing old
    /// and new exports end up with a single answer column this way.
    pub fn rename_column(&self, from: &str, to: &str) -> Self {
        let Some(from_idx) = self.column_index(from) else {
            return self.clone();
        };
        match self.column_index(to) {
            None => {
                let mut renamed = self.clone();
                renamed.columns[from_idx] = to.to_string();
                renamed
            }
            Some(to_idx) => {
                let columns = self
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != from_idx)
                    .map(|(_, c)| c.clone())
                    .collect();
                let rows = self
                    .rows
                    .iter()
                    .map(|row| {
                        let mut merged = row.clone();
                        if merged[to_idx].is_empty() {
                            merged[to_idx] = row[from_idx].clone();
                        }
                        merged.remove(from_idx);
                        merged
                    })
                    .collect();
                Self { columns, rows }
            }
        }
    }

    /// Keep only the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> StatsResult<Self> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<StatsResult<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }

    /// Keep rows matching a predicate
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Drop exact duplicate rows, keeping the first occurrence
    pub fn dedup_rows(&self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.filter_rows(|row| seen.insert(row.to_vec()))
    }

    /// Split into consecutive tables of at most `size` rows
    pub fn chunks(&self, size: usize) -> Vec<Self> {
        self.rows
            .chunks(size.max(1))
            .map(|chunk| Self {
                columns: self.columns.clone(),
                rows: chunk.to_vec(),
            })
            .collect()
    }

    /// Return a copy with `values` appended as column `name`.
    ///
    /// Missing values are left empty; surplus values are ignored.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut extended = row.clone();
                extended.push(values.next().unwrap_or_default());
                extended
            })
            .collect();
        Self { columns, rows }
    }

    /// Concatenate tables, aligning columns by name.
    ///
    /// The result has the union of all columns in first-seen order; cells of
    /// columns a table does not have are left empty.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Table>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut parts = Vec::new();
        for table in tables {
            for c in &table.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
            parts.push(table);
        }

        let mut rows = Vec::new();
        for table in parts {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|m| m.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }
        Self { columns, rows }
    }
}
