//! Header row location strategies.
//!
//! Sheets exported from the school system often carry title rows above the
//! real header. A [`HeaderLocator`] decides which data row is the header;
//! returning `None` means the provisional header is kept.

use std::fmt;

use attendance_model::{HEADER_MARKER, Table, is_attendance_column};
use serde::{Deserialize, Serialize};

/// Capability: find the index of the true header row among a table's rows.
pub trait HeaderLocator {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns the index into `table.rows` of the header row, if any.
    fn locate(&self, table: &Table) -> Option<usize>;
}

/// Picks the first row holding a cell equal to the marker label.
#[derive(Debug, Clone)]
pub struct MarkerLocator {
    marker: String,
}

impl MarkerLocator {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self::new(HEADER_MARKER)
    }
}

impl HeaderLocator for MarkerLocator {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn locate(&self, table: &Table) -> Option<usize> {
        table
            .rows
            .iter()
            .position(|row| row.iter().any(|cell| cell.matches_text(&self.marker)))
    }
}

/// Picks the first row with a cell containing an attendance keyword.
///
/// Does nothing when a column name already carries a keyword, so a sheet
/// with a correct header is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordLocator;

impl HeaderLocator for KeywordLocator {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn locate(&self, table: &Table) -> Option<usize> {
        if table.columns.iter().any(|name| is_attendance_column(name)) {
            return None;
        }
        table.rows.iter().position(|row| {
            row.iter()
                .filter_map(|cell| cell.as_text())
                .any(is_attendance_column)
        })
    }
}

/// Selectable header strategy, as exposed in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    #[default]
    Marker,
    Keyword,
}

impl HeaderStrategy {
    pub fn locator(self) -> Box<dyn HeaderLocator> {
        match self {
            Self::Marker => Box::new(MarkerLocator::default()),
            Self::Keyword => Box::new(KeywordLocator),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Keyword => "keyword",
        }
    }
}

impl fmt::Display for HeaderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_model::{ATTENDANCE_KEYWORDS, CellValue};

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            columns.iter().map(|c| (*c).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| CellValue::text(v)).collect())
                .collect(),
        )
    }

    #[test]
    fn marker_locator_finds_first_matching_row() {
        let t = table(
            &["Report", "x"],
            &[&["title", ""], &["اسم الطالب", "w1"], &["اسم الطالب", "w1"]],
        );
        assert_eq!(MarkerLocator::default().locate(&t), Some(1));
    }

    #[test]
    fn marker_locator_ignores_header_labels() {
        let t = table(&["اسم الطالب", "w1"], &[&["Ahmed", "x"]]);
        assert_eq!(MarkerLocator::default().locate(&t), None);
    }

    #[test]
    fn marker_locator_needs_whole_cell_match() {
        let t = table(&["a"], &[&["اسم الطالب الثلاثي"]]);
        assert_eq!(MarkerLocator::default().locate(&t), None);
    }

    #[test]
    fn keyword_locator_matches_substring() {
        let label = format!("{} (نهاية)", ATTENDANCE_KEYWORDS[1]);
        let t = table(&["a", "b"], &[&["", ""], &["الاسم", label.as_str()]]);
        assert_eq!(KeywordLocator.locate(&t), Some(1));
    }

    #[test]
    fn keyword_locator_skips_when_header_is_correct() {
        let t = table(&["الاسم", ATTENDANCE_KEYWORDS[0]], &[&["x", ATTENDANCE_KEYWORDS[0]]]);
        assert_eq!(KeywordLocator.locate(&t), None);
    }

    #[test]
    fn strategy_builds_matching_locator() {
        assert_eq!(HeaderStrategy::Marker.locator().name(), "marker");
        assert_eq!(HeaderStrategy::Keyword.locator().name(), "keyword");
        assert_eq!(HeaderStrategy::default(), HeaderStrategy::Marker);
    }
}
