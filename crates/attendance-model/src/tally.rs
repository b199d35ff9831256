//! Attendance columns and per-student tallies.

use serde::{Deserialize, Serialize};

use crate::status::AttendanceStatus;

/// Non-empty, ordered list of attendance column names.
///
/// Constructing one is the precondition check for tallying: a sheet whose
/// column scan came back empty cannot produce a value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AttendanceColumns(Vec<String>);

impl AttendanceColumns {
    /// Returns `None` for an empty list.
    pub fn new(columns: Vec<String>) -> Option<Self> {
        if columns.is_empty() {
            None
        } else {
            Some(Self(columns))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for AttendanceColumns {
    type Error = &'static str;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("attendance column list must not be empty")
    }
}

impl From<AttendanceColumns> for Vec<String> {
    fn from(value: AttendanceColumns) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a AttendanceColumns {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Counts and percentages for one student.
///
/// `absent` already includes `unrecorded` and `unrecognized`; those two are
/// kept separately for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceTally {
    pub total: usize,
    pub present: usize,
    pub moderate: usize,
    pub absent: usize,
    pub unrecorded: usize,
    pub unrecognized: usize,
}

impl AttendanceTally {
    /// Adds one classified cell to the tally.
    pub fn record(&mut self, status: AttendanceStatus) {
        self.total += 1;
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Moderate => self.moderate += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Unrecorded => {
                self.absent += 1;
                self.unrecorded += 1;
            }
            AttendanceStatus::Unrecognized => {
                self.absent += 1;
                self.unrecognized += 1;
            }
        }
    }

    pub fn present_pct(&self) -> f64 {
        percentage(self.present, self.total)
    }

    pub fn moderate_pct(&self) -> f64 {
        percentage(self.moderate, self.total)
    }

    pub fn absent_pct(&self) -> f64 {
        percentage(self.absent, self.total)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}
