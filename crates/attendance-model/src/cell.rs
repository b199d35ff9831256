//! Spreadsheet cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell as supplied by the spreadsheet reader.
///
/// `Empty` is a cell that exists but holds an empty string, `Missing` is a
/// cell the sheet never populated (or a short row padded out to the table
/// width). Both count as unrecorded attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
    Missing,
}

impl CellValue {
    /// Builds a text cell, folding whitespace-only input into `Empty`.
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Returns the text payload when this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// True for `Empty` and `Missing`.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Empty | Self::Missing)
    }

    /// Renders the cell as plain text; blanks render as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => format_number(*value),
            Self::Bool(value) => value.to_string(),
            Self::Empty | Self::Missing => String::new(),
        }
    }

    /// True if the cell's text form equals `needle` after trimming.
    pub fn matches_text(&self, needle: &str) -> bool {
        match self {
            Self::Text(value) => value.trim() == needle,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_trims_and_folds_blank() {
        assert_eq!(CellValue::text("  a "), CellValue::Text("a".to_string()));
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert_eq!(CellValue::text("\u{feff}"), CellValue::Empty);
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(CellValue::Number(3.0).to_text(), "3");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn blanks_render_empty() {
        assert!(CellValue::Missing.is_blank());
        assert!(CellValue::Empty.is_blank());
        assert_eq!(CellValue::Missing.to_text(), "");
    }
}
