//! In-memory tables as produced by the spreadsheet reader.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// An ordered set of named columns over ordered rows.
///
/// Every row holds exactly `columns.len()` cells; constructors pad short
/// rows with [`CellValue::Missing`] and truncate long ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table, padding or truncating rows to the column count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Missing);
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Iterates the cells of one column top to bottom.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// Returns a read-only view of one row.
    pub fn record(&self, row: usize) -> Option<StudentRecord<'_>> {
        self.rows.get(row).map(|cells| StudentRecord {
            position: row,
            columns: &self.columns,
            cells,
        })
    }

    /// Iterates all rows as student records.
    pub fn records(&self) -> impl Iterator<Item = StudentRecord<'_>> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(position, cells)| StudentRecord {
                position,
                columns: &self.columns,
                cells,
            })
    }

    /// Reorders columns according to `order`, a permutation of column indices.
    pub fn reorder_columns(&self, order: &[usize]) -> Self {
        let columns = order.iter().map(|&idx| self.columns[idx].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| order.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Self { columns, rows }
    }
}

/// One row of a normalized table.
///
/// The identity (student name) is the first column; the renderer receives
/// it as plain text.
#[derive(Debug, Clone, Copy)]
pub struct StudentRecord<'a> {
    position: usize,
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> StudentRecord<'a> {
    /// Zero-based position of the row inside its table.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn identity(&self) -> &'a CellValue {
        self.cells.first().unwrap_or(&CellValue::Missing)
    }

    pub fn identity_text(&self) -> String {
        self.identity().to_text()
    }

    /// Looks up a cell by column name; unknown columns read as missing.
    pub fn get(&self, column: &str) -> &'a CellValue {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.cells.get(idx))
            .unwrap_or(&CellValue::Missing)
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }

    /// True when every cell in the row is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}
