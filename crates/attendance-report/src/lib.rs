//! Student report output.
//!
//! - [`PdfRenderer`]: one PDF page per student, implementing
//!   [`attendance_core::ReportRenderer`].
//! - [`write_summary_file`]: per-sheet CSV of counts and percentages.
//! - [`ReportConfig`]: assets, page size and labels, loaded from TOML.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
mod fonts;
mod images;
mod pdf;
pub mod shaping;
mod summary;

pub use config::{AssetPaths, PageSize, ReportConfig};
pub use error::{ConfigError, ReportError, Result};
pub use pdf::{PdfRenderer, sanitize_component};
pub use summary::{SUMMARY_FILE_NAME, write_summary, write_summary_file};
