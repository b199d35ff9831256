//! Per-sheet `summary.csv` export.

use std::io::Write;
use std::path::{Path, PathBuf};

use attendance_core::SheetSummary;
use serde::Serialize;

use crate::error::{ReportError, Result};

pub const SUMMARY_FILE_NAME: &str = "summary.csv";

#[derive(Serialize)]
struct SummaryRow<'a> {
    index: usize,
    name: &'a str,
    present: usize,
    moderate: usize,
    absent: usize,
    unrecorded: usize,
    unrecognized: usize,
    present_pct: String,
    moderate_pct: String,
    absent_pct: String,
    report: String,
}

/// Writes one CSV row per student of `sheet`.
pub fn write_summary<W: Write>(writer: W, sheet: &SheetSummary) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for student in &sheet.students {
        let tally = &student.tally;
        csv.serialize(SummaryRow {
            index: student.index,
            name: &student.name,
            present: tally.present,
            moderate: tally.moderate,
            absent: tally.absent,
            unrecorded: tally.unrecorded,
            unrecognized: tally.unrecognized,
            present_pct: format!("{:.2}", tally.present_pct()),
            moderate_pct: format!("{:.2}", tally.moderate_pct()),
            absent_pct: format!("{:.2}", tally.absent_pct()),
            report: student
                .output
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes `summary.csv` into `dir`, returning its path.
pub fn write_summary_file(dir: &Path, sheet: &SheetSummary) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;
    let path = dir.join(SUMMARY_FILE_NAME);
    let file = std::fs::File::create(&path).map_err(|e| ReportError::io(&path, e))?;
    write_summary(std::io::BufWriter::new(file), sheet)?;
    Ok(path)
}
