//! Per-student attendance tally.

use attendance_model::{
    AttendanceColumns, AttendanceStatus, AttendanceTally, StudentRecord, attendance_week,
};
use serde::Serialize;

/// Status of a single attendance column for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStatus {
    pub column: String,
    /// Week number parsed from the column label, if it carries a keyword.
    pub week: Option<usize>,
    /// Raw cell text as it appeared in the sheet.
    pub value: String,
    pub status: AttendanceStatus,
}

/// Counts the four status categories over the attendance columns of a row.
///
/// Unrecorded and unrecognized cells land in the absent bucket, so
/// `present + moderate + absent == columns.len()` always holds.
pub fn tally(record: &StudentRecord<'_>, columns: &AttendanceColumns) -> AttendanceTally {
    let mut tally = AttendanceTally::default();
    for column in columns {
        tally.record(AttendanceStatus::classify(record.get(column)));
    }
    tally
}

/// Per-column breakdown of a row, in attendance column order.
pub fn week_statuses(record: &StudentRecord<'_>, columns: &AttendanceColumns) -> Vec<WeekStatus> {
    columns
        .iter()
        .map(|column| {
            let cell = record.get(column);
            WeekStatus {
                column: column.clone(),
                week: attendance_week(column),
                value: cell.to_text(),
                status: AttendanceStatus::classify(cell),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_model::{CellValue, Table};

    fn four_weeks() -> AttendanceColumns {
        AttendanceColumns::new(vec![
            "w1".to_string(),
            "w2".to_string(),
            "w3".to_string(),
            "w4".to_string(),
        ])
        .expect("non-empty")
    }

    fn single_row(cells: &[&str]) -> Table {
        Table::from_rows(
            vec![
                "name".to_string(),
                "w1".to_string(),
                "w2".to_string(),
                "w3".to_string(),
                "w4".to_string(),
            ],
            vec![cells.iter().map(|v| CellValue::text(v)).collect()],
        )
    }

    #[test]
    fn mixed_row_counts_and_percentages() {
        let table = single_row(&["Ahmed", "ملتزم بالحضور", "متوسط الالتزام", "لا يحضر", ""]);
        let record = table.record(0).expect("row");
        let result = tally(&record, &four_weeks());
        assert_eq!(result.present, 1);
        assert_eq!(result.moderate, 1);
        assert_eq!(result.absent, 2);
        assert_eq!(result.unrecorded, 1);
        assert_eq!(format!("{:.2}", result.present_pct()), "25.00");
        assert_eq!(format!("{:.2}", result.moderate_pct()), "25.00");
        assert_eq!(format!("{:.2}", result.absent_pct()), "50.00");
    }

    #[test]
    fn unrecognized_values_count_as_absent() {
        let table = single_row(&["Sara", "ملتزم بالحضور", "غائب بعذر", "ملتزم بالحضور", "?"]);
        let record = table.record(0).expect("row");
        let result = tally(&record, &four_weeks());
        assert_eq!(result.present, 2);
        assert_eq!(result.absent, 2);
        assert_eq!(result.unrecognized, 2);
        assert!((result.absent_pct() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_column_reads_as_unrecorded() {
        let table = single_row(&["Ali"]);
        let record = table.record(0).expect("row");
        let columns = AttendanceColumns::new(vec!["w9".to_string()]).expect("non-empty");
        let result = tally(&record, &columns);
        assert_eq!(result.absent, 1);
        assert_eq!(result.unrecorded, 1);
        assert!((result.absent_pct() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn week_statuses_keep_raw_values() {
        let table = single_row(&["Ahmed", "ملتزم بالحضور", "x", "", "لا يحضر"]);
        let record = table.record(0).expect("row");
        let weeks = week_statuses(&record, &four_weeks());
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[0].status, AttendanceStatus::Present);
        assert_eq!(weeks[1].value, "x");
        assert_eq!(weeks[1].status, AttendanceStatus::Unrecognized);
        assert_eq!(weeks[2].status, AttendanceStatus::Unrecorded);
        assert_eq!(weeks[3].week, None);
    }
}
