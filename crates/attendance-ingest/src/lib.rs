//! Attendance workbook ingestion.
//!
//! This crate opens spreadsheet workbooks (via calamine) or CSV files and
//! turns every worksheet into a raw [`attendance_model::Table`]. No header
//! detection happens here: the first sheet row is kept as a provisional
//! header, and `attendance-core` later locates the real one.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use attendance_ingest::read_workbook;
//!
//! for sheet in read_workbook(Path::new("attendance.xlsx"))? {
//!     let sheet = sheet?;
//!     println!("{}: {} rows", sheet.name, sheet.table.height());
//! }
//! ```

mod discovery;
mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbook Reading ===
pub use reader::{
    MAX_WORKBOOK_FILE_SIZE, RawSheet, SheetRead, WorkbookFormat, check_file_size,
    check_file_size_with_limit, grid_to_table, read_workbook,
};

// === File Discovery ===
pub use discovery::{list_workbook_files, resolve_inputs};
