//! Data model for student attendance sheets.
//!
//! - [`cell`]: typed spreadsheet cells
//! - [`table`]: tables and the per-row [`StudentRecord`] view
//! - [`status`]: the closed set of attendance statuses
//! - [`tally`]: attendance column lists and per-student tallies
//! - [`vocabulary`]: the fixed Arabic marker, keyword and status literals

#![deny(unsafe_code)]

pub mod cell;
pub mod status;
pub mod table;
pub mod tally;
pub mod vocabulary;

pub use cell::{CellValue, format_number};
pub use status::AttendanceStatus;
pub use table::{StudentRecord, Table};
pub use tally::{AttendanceColumns, AttendanceTally};
pub use vocabulary::{
    ABSENT_LITERAL, ATTENDANCE_KEYWORDS, HEADER_MARKER, MODERATE_LITERAL, PRESENT_LITERAL,
    attendance_week, is_attendance_column,
};
