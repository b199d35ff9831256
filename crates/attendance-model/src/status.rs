//! Attendance status classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::vocabulary::{ABSENT_LITERAL, MODERATE_LITERAL, PRESENT_LITERAL};

/// Status of one attendance cell.
///
/// `Unrecognized` covers non-empty values outside the three literals; the
/// tally folds it into the absent bucket together with `Unrecorded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Moderate,
    Absent,
    Unrecorded,
    Unrecognized,
}

impl AttendanceStatus {
    /// Classifies a cell by exact match against the status literals.
    pub fn classify(cell: &CellValue) -> Self {
        match cell {
            CellValue::Empty | CellValue::Missing => Self::Unrecorded,
            CellValue::Text(value) => match value.as_str() {
                PRESENT_LITERAL => Self::Present,
                MODERATE_LITERAL => Self::Moderate,
                ABSENT_LITERAL => Self::Absent,
                _ => Self::Unrecognized,
            },
            CellValue::Number(_) | CellValue::Bool(_) => Self::Unrecognized,
        }
    }

    /// True for every status that lands in the absent bucket.
    pub const fn counts_as_absent(self) -> bool {
        matches!(self, Self::Absent | Self::Unrecorded | Self::Unrecognized)
    }

    /// The sheet literal for the three recorded statuses.
    pub const fn literal(self) -> Option<&'static str> {
        match self {
            Self::Present => Some(PRESENT_LITERAL),
            Self::Moderate => Some(MODERATE_LITERAL),
            Self::Absent => Some(ABSENT_LITERAL),
            Self::Unrecorded | Self::Unrecognized => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Moderate => "moderate",
            Self::Absent => "absent",
            Self::Unrecorded => "unrecorded",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
