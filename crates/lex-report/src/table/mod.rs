//! In-memory canonical table.
//!
//! A [`Table`] is an ordered list of column names plus rows positionally
//! aligned to them. Names may repeat in raw input; after cleaning they are
//! unique. Name lookups always resolve to the left-most column.

mod cell;
mod frame;

pub use cell::{CellValue, ColumnKind, DATETIME_FORMAT};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Assemble a table from parts that are already aligned.
    ///
    /// Callers guarantee every row has exactly `columns.len()` cells; the
    /// [`loader`](crate::loader) is the public entry point that enforces it.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the left-most column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cells of the column at `index`, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Cells of the left-most column called `name`.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        self.column_index(name).map(|index| self.column_values(index))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Cell at `row` in the left-most column called `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&CellValue> {
        self.column_index(name).and_then(|column| self.cell(row, column))
    }

    pub fn column_kind(&self, index: usize) -> ColumnKind {
        ColumnKind::of(self.column_values(index))
    }

    pub fn null_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|cell| cell.is_null()).count()
    }

    /// Total number of null cells.
    pub fn total_nulls(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_null())
            .count()
    }
}
