//! Header discovery, table normalization and attendance tallies.
//!
//! The flow for one worksheet is:
//!
//! 1. [`normalize_with`] re-bases the table on the header row picked by a
//!    [`HeaderLocator`] and deduplicates column labels.
//! 2. [`crop`] moves the student-name column to the front.
//! 3. [`identify_attendance_columns`] lists the weekly attendance columns.
//! 4. [`process_sheet`] tallies every row and hands it to a
//!    [`ReportRenderer`].
//!
//! Nothing here touches the filesystem; rendering is injected.

#![deny(unsafe_code)]

pub mod header;
pub mod normalize;
pub mod pipeline;
pub mod tally;

pub use header::{HeaderLocator, HeaderStrategy, KeywordLocator, MarkerLocator};
pub use normalize::{
    Normalized, crop, crop_on, deduplicate, identify_attendance_columns, normalize,
    normalize_with,
};
pub use pipeline::{
    NullRenderer, PreparedSheet, ReportRenderer, SheetOutcome, SheetSummary, SkipReason,
    StudentReport, StudentSummary, prepare_sheet, process_sheet,
};
pub use tally::{WeekStatus, tally, week_statuses};
