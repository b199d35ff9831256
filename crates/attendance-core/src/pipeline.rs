//! Per-sheet processing: normalize, tally every row, hand each student to a
//! report renderer.
//!
//! A sheet never aborts the batch. Missing attendance columns skip the
//! sheet; a renderer error stops that sheet and is reported in its summary.

use std::collections::BTreeSet;
use std::path::PathBuf;

use attendance_model::{AttendanceColumns, AttendanceStatus, AttendanceTally, Table};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::header::HeaderLocator;
use crate::normalize::{crop, identify_attendance_columns, normalize_with};
use crate::tally::{WeekStatus, tally, week_statuses};

/// Everything a renderer needs for one student.
#[derive(Debug, Clone, Serialize)]
pub struct StudentReport<'a> {
    pub sheet: &'a str,
    /// 1-based position among the sheet's reported students.
    pub index: usize,
    /// Identity column value as plain, unshaped text.
    pub name: String,
    pub tally: AttendanceTally,
    pub weeks: Vec<WeekStatus>,
}

/// Output collaborator for student reports.
pub trait ReportRenderer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once before the first student of a sheet.
    fn begin_sheet(&mut self, _sheet: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Renders one report, returning the written artifact if any.
    fn render(&mut self, report: &StudentReport<'_>) -> Result<Option<PathBuf>, Self::Error>;
}

/// Renderer that writes nothing; used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl ReportRenderer for NullRenderer {
    type Error = std::convert::Infallible;

    fn render(&mut self, _report: &StudentReport<'_>) -> Result<Option<PathBuf>, Self::Error> {
        Ok(None)
    }
}

impl<R: ReportRenderer + ?Sized> ReportRenderer for &mut R {
    type Error = R::Error;

    fn begin_sheet(&mut self, sheet: &str) -> Result<(), Self::Error> {
        (**self).begin_sheet(sheet)
    }

    fn render(&mut self, report: &StudentReport<'_>) -> Result<Option<PathBuf>, Self::Error> {
        (**self).render(report)
    }
}

/// A sheet after normalization and cropping.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSheet {
    pub name: String,
    pub table: Table,
    /// Header row used for re-basing, as an index into the raw rows.
    pub header_row: Option<usize>,
    pub attendance_columns: Vec<String>,
}

impl PreparedSheet {
    /// The attendance columns, or `None` when the sheet has none.
    pub fn attendance(&self) -> Option<AttendanceColumns> {
        AttendanceColumns::new(self.attendance_columns.clone())
    }
}

/// Runs the normalizer chain on one raw sheet.
pub fn prepare_sheet(name: &str, raw: &Table, locator: &dyn HeaderLocator) -> PreparedSheet {
    let normalized = normalize_with(raw, locator);
    let table = crop(&normalized.table);
    let attendance_columns = identify_attendance_columns(&table);
    debug!(
        sheet = name,
        header_row = ?normalized.header_row,
        columns = table.width(),
        attendance = attendance_columns.len(),
        "prepared sheet"
    );
    PreparedSheet {
        name: name.to_string(),
        table,
        header_row: normalized.header_row,
        attendance_columns,
    }
}

/// Why a sheet produced no reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoAttendanceColumns,
    NoRows,
}

impl SkipReason {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoAttendanceColumns => "no attendance columns found",
            Self::NoRows => "no student rows",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Completed,
    Skipped { reason: SkipReason },
    Failed { message: String },
}

impl SheetOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub index: usize,
    pub name: String,
    pub tally: AttendanceTally,
    pub output: Option<PathBuf>,
}

/// Result of processing one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub header_row: Option<usize>,
    pub rows: usize,
    pub attendance_columns: Vec<String>,
    pub students: Vec<StudentSummary>,
    /// Distinct cell values that matched none of the status literals.
    pub unrecognized_values: BTreeSet<String>,
    pub outcome: SheetOutcome,
}

impl SheetSummary {
    fn new(sheet: &PreparedSheet, outcome: SheetOutcome) -> Self {
        Self {
            name: sheet.name.clone(),
            header_row: sheet.header_row,
            rows: sheet.table.height(),
            attendance_columns: sheet.attendance_columns.clone(),
            students: Vec::new(),
            unrecognized_values: BTreeSet::new(),
            outcome,
        }
    }

    pub fn reports_written(&self) -> usize {
        self.students
            .iter()
            .filter(|student| student.output.is_some())
            .count()
    }
}

/// Tallies every non-blank row of a prepared sheet and renders its report.
///
/// Rows whose cells are all blank are skipped; reported students are
/// numbered from 1 without gaps.
pub fn process_sheet<R>(sheet: &PreparedSheet, mut renderer: R) -> SheetSummary
where
    R: ReportRenderer,
{
    let Some(columns) = sheet.attendance() else {
        warn!(sheet = %sheet.name, "no attendance columns found, skipping sheet");
        return SheetSummary::new(
            sheet,
            SheetOutcome::Skipped {
                reason: SkipReason::NoAttendanceColumns,
            },
        );
    };
    let mut summary = SheetSummary::new(sheet, SheetOutcome::Completed);
    if let Err(error) = renderer.begin_sheet(&sheet.name) {
        warn!(sheet = %sheet.name, %error, "renderer rejected sheet");
        summary.outcome = SheetOutcome::Failed {
            message: error.to_string(),
        };
        return summary;
    }

    for record in sheet.table.records().filter(|record| !record.is_blank()) {
        let weeks = week_statuses(&record, &columns);
        for week in &weeks {
            if week.status == AttendanceStatus::Unrecognized {
                summary.unrecognized_values.insert(week.value.clone());
            }
        }
        let report = StudentReport {
            sheet: &sheet.name,
            index: summary.students.len() + 1,
            name: record.identity_text(),
            tally: tally(&record, &columns),
            weeks,
        };
        match renderer.render(&report) {
            Ok(output) => summary.students.push(StudentSummary {
                index: report.index,
                name: report.name,
                tally: report.tally,
                output,
            }),
            Err(error) => {
                warn!(sheet = %sheet.name, index = report.index, %error, "failed to render report");
                summary.outcome = SheetOutcome::Failed {
                    message: format!("student {}: {error}", report.index),
                };
                return summary;
            }
        }
    }

    if summary.students.is_empty() {
        warn!(sheet = %sheet.name, "sheet has no student rows");
        summary.outcome = SheetOutcome::Skipped {
            reason: SkipReason::NoRows,
        };
    }
    if !summary.unrecognized_values.is_empty() {
        warn!(
            sheet = %sheet.name,
            values = ?summary.unrecognized_values,
            "unrecognized attendance values counted as absent"
        );
    }
    info!(
        sheet = %sheet.name,
        students = summary.students.len(),
        written = summary.reports_written(),
        "processed sheet"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MarkerLocator;
    use attendance_model::{ATTENDANCE_KEYWORDS, CellValue, HEADER_MARKER};

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[derive(Default)]
    struct Recording {
        sheets: Vec<String>,
        names: Vec<(usize, String)>,
        fail_at: Option<usize>,
    }

    impl ReportRenderer for Recording {
        type Error = Boom;

        fn begin_sheet(&mut self, sheet: &str) -> Result<(), Boom> {
            self.sheets.push(sheet.to_string());
            Ok(())
        }

        fn render(&mut self, report: &StudentReport<'_>) -> Result<Option<PathBuf>, Boom> {
            if self.fail_at == Some(report.index) {
                return Err(Boom);
            }
            self.names.push((report.index, report.name.clone()));
            Ok(Some(PathBuf::from(format!("student_{}.pdf", report.index))))
        }
    }

    fn raw_sheet() -> Table {
        let rows = vec![
            vec![CellValue::text("كشف الحضور"), CellValue::Missing, CellValue::Missing],
            vec![
                CellValue::text(HEADER_MARKER),
                CellValue::text(ATTENDANCE_KEYWORDS[0]),
                CellValue::text(ATTENDANCE_KEYWORDS[1]),
            ],
            vec![
                CellValue::text("Ahmed"),
                CellValue::text("ملتزم بالحضور"),
                CellValue::text("غائب بعذر"),
            ],
            vec![CellValue::Missing, CellValue::Missing, CellValue::Missing],
            vec![CellValue::text("Sara"), CellValue::Empty, CellValue::text("لا يحضر")],
        ];
        Table::from_rows(
            vec!["Unnamed: 0".into(), "Unnamed: 1".into(), "Unnamed: 2".into()],
            rows,
        )
    }

    #[test]
    fn renders_each_student_with_sequential_index() {
        let prepared = prepare_sheet("Class A", &raw_sheet(), &MarkerLocator::default());
        let mut renderer = Recording::default();
        let summary = process_sheet(&prepared, &mut renderer);

        assert_eq!(summary.outcome, SheetOutcome::Completed);
        assert_eq!(renderer.sheets, vec!["Class A"]);
        assert_eq!(
            renderer.names,
            vec![(1, "Ahmed".to_string()), (2, "Sara".to_string())]
        );
        assert_eq!(summary.reports_written(), 2);
        assert_eq!(summary.header_row, Some(1));
        assert!(summary.unrecognized_values.contains("غائب بعذر"));
        assert_eq!(summary.students[1].tally.absent, 2);
    }

    #[test]
    fn sheet_without_attendance_columns_is_skipped() {
        let raw = Table::from_rows(
            vec![HEADER_MARKER.into(), "العمر".into()],
            vec![vec![CellValue::text("Ahmed"), CellValue::Number(12.0)]],
        );
        let prepared = prepare_sheet("Ages", &raw, &MarkerLocator::default());
        let mut renderer = Recording::default();
        let summary = process_sheet(&prepared, &mut renderer);

        assert_eq!(
            summary.outcome,
            SheetOutcome::Skipped {
                reason: SkipReason::NoAttendanceColumns
            }
        );
        assert!(renderer.sheets.is_empty());
        assert!(summary.students.is_empty());
    }

    #[test]
    fn renderer_error_fails_only_the_sheet() {
        let prepared = prepare_sheet("Class A", &raw_sheet(), &MarkerLocator::default());
        let mut renderer = Recording {
            fail_at: Some(2),
            ..Recording::default()
        };
        let summary = process_sheet(&prepared, &mut renderer);

        assert!(summary.outcome.is_failure());
        assert_eq!(summary.students.len(), 1);
        assert_eq!(
            summary.outcome,
            SheetOutcome::Failed {
                message: "student 2: boom".to_string()
            }
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let prepared = prepare_sheet("Class A", &raw_sheet(), &MarkerLocator::default());
        let summary = process_sheet(&prepared, NullRenderer);
        assert_eq!(summary.students.len(), 2);
        assert_eq!(summary.reports_written(), 0);
    }
}
