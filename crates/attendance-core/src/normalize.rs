//! Table normalization: header re-basing, label deduplication, identity
//! column placement and attendance column discovery.
//!
//! None of these operations fail. When the expected structure is absent the
//! input passes through unchanged.

use std::collections::{HashMap, HashSet};

use attendance_model::{HEADER_MARKER, Table, is_attendance_column};
use tracing::debug;

use crate::header::{HeaderLocator, MarkerLocator};

/// Outcome of [`normalize_with`]: the new table plus the header row that was
/// used, as an index into the input's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: Table,
    pub header_row: Option<usize>,
}

/// Normalizes with the default marker-based header search.
pub fn normalize(table: &Table) -> Table {
    normalize_with(table, &MarkerLocator::default()).table
}

/// Re-bases `table` on the row chosen by `locator` and deduplicates labels.
///
/// Rows above and including the header row are dropped. Without a header
/// row only the existing labels are deduplicated.
pub fn normalize_with(table: &Table, locator: &dyn HeaderLocator) -> Normalized {
    let Some(header_row) = locator.locate(table) else {
        debug!(strategy = locator.name(), "no header row located, keeping sheet header");
        return Normalized {
            table: Table::from_rows(deduplicate(&table.columns), table.rows.clone()),
            header_row: None,
        };
    };
    debug!(strategy = locator.name(), header_row, "re-basing table on located header row");
    let labels: Vec<String> = table.rows[header_row]
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            if cell.is_blank() {
                format!("Unnamed: {idx}")
            } else {
                cell.to_text()
            }
        })
        .collect();
    let rows = table.rows[header_row + 1..].to_vec();
    Normalized {
        table: Table::from_rows(deduplicate(&labels), rows),
        header_row: Some(header_row),
    }
}

/// Makes column labels unique, left to right.
///
/// The first occurrence of a label is kept; the k-th repeat becomes
/// `label_k`. A generated name that would collide with a label already
/// taken moves on to the next free suffix.
pub fn deduplicate<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut result = Vec::with_capacity(columns.len());
    for column in columns {
        let name = column.as_ref();
        if !taken.contains(name) && !counts.contains_key(name) {
            counts.insert(name, 0);
            taken.insert(name.to_string());
            result.push(name.to_string());
            continue;
        }
        let count = counts.entry(name).or_insert(0);
        let candidate = loop {
            *count += 1;
            let candidate = format!("{name}_{count}");
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(candidate.clone());
        result.push(candidate);
    }
    result
}

/// Moves the column whose cells contain the header marker to the front.
pub fn crop(table: &Table) -> Table {
    crop_on(table, HEADER_MARKER)
}

/// Moves the first column holding a cell equal to `marker` to position 0;
/// other columns keep their relative order.
pub fn crop_on(table: &Table, marker: &str) -> Table {
    let found = (0..table.width()).find(|&idx| {
        table
            .column_values(idx)
            .any(|cell| cell.matches_text(marker))
    });
    match found {
        Some(idx) if idx > 0 => {
            debug!(column = %table.columns[idx], "moving identity column to the front");
            let order: Vec<usize> = std::iter::once(idx)
                .chain((0..table.width()).filter(|&other| other != idx))
                .collect();
            table.reorder_columns(&order)
        }
        _ => table.clone(),
    }
}

/// Names of the attendance columns, in table column order.
pub fn identify_attendance_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|name| is_attendance_column(name))
        .cloned()
        .collect()
}
