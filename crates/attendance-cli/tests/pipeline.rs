//! End-to-end runs of the generate and inspect pipelines over CSV workbooks.

use std::path::{Path, PathBuf};

use attendance_cli::pipeline::{GenerateOptions, generate, inspect};
use attendance_core::{HeaderStrategy, SheetOutcome, SkipReason};
use attendance_report::{AssetPaths, ReportConfig};
use indicatif::ProgressBar;

const CLASS_CSV: &str = "\
كشف حضور الفصل,,
اسم الطالب,الحضور والغياب الاسبوع الأول,الحضور والغياب الاسبوع الثاني
Ahmed,ملتزم بالحضور,لا يحضر
,,
Sara,متوسط الالتزام,
";

const NOTES_CSV: &str = "\
اسم الطالب,ملاحظات
Ahmed,-
";

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

fn options(output_dir: &Path) -> GenerateOptions {
    GenerateOptions {
        output_dir: output_dir.to_path_buf(),
        config: ReportConfig {
            assets: AssetPaths::none(),
            ..ReportConfig::default()
        },
        dry_run: false,
        write_summary: true,
    }
}

#[test]
fn single_workbook_writes_reports_per_sheet() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    let workbook = write_file(input.path(), "class_a.csv", CLASS_CSV);

    let result =
        generate(&workbook, &options(output.path()), &ProgressBar::hidden()).expect("generate");

    assert!(!result.has_errors());
    assert_eq!(result.reports_written(), 2);
    let sheet = &result.workbooks[0].sheets[0];
    assert_eq!(sheet.outcome, SheetOutcome::Completed);
    assert_eq!(sheet.header_row, Some(0));
    assert_eq!(sheet.attendance_columns.len(), 2);
    assert_eq!(sheet.students[1].name, "Sara");
    assert_eq!(sheet.students[1].tally.unrecorded, 1);

    let sheet_dir = output.path().join("class_a");
    for name in ["student_1.pdf", "student_2.pdf", "summary.csv"] {
        assert!(sheet_dir.join(name).is_file(), "missing {name}");
    }
    let doc = lopdf::Document::load(sheet_dir.join("student_1.pdf")).expect("pdf");
    assert_eq!(doc.get_pages().len(), 1);
    assert_eq!(result.workbooks[0].summary_files, vec![sheet_dir.join("summary.csv")]);
}

#[test]
fn dry_run_writes_nothing() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    let workbook = write_file(input.path(), "class_a.csv", CLASS_CSV);
    let options = GenerateOptions {
        dry_run: true,
        ..options(output.path())
    };

    let result = generate(&workbook, &options, &ProgressBar::hidden()).expect("generate");

    assert_eq!(result.reports_written(), 0);
    assert_eq!(result.workbooks[0].sheets[0].students.len(), 2);
    assert!(result.workbooks[0].summary_files.is_empty());
    let entries = std::fs::read_dir(output.path()).expect("read output").count();
    assert_eq!(entries, 0);
}

#[test]
fn folder_input_nests_workbooks_and_skips_sheets_without_attendance() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_file(input.path(), "class_a.csv", CLASS_CSV);
    write_file(input.path(), "notes.csv", NOTES_CSV);
    write_file(input.path(), "readme.txt", "ignored");

    let result =
        generate(input.path(), &options(output.path()), &ProgressBar::hidden()).expect("generate");

    assert_eq!(result.workbooks.len(), 2);
    assert!(!result.has_errors());
    assert!(
        output
            .path()
            .join("class_a")
            .join("class_a")
            .join("student_2.pdf")
            .is_file()
    );
    let notes = &result.workbooks[1].sheets[0];
    assert_eq!(
        notes.outcome,
        SheetOutcome::Skipped {
            reason: SkipReason::NoAttendanceColumns
        }
    );
    assert!(!output.path().join("notes").join("notes").exists());
}

#[test]
fn missing_input_is_an_error() {
    let output = tempfile::tempdir().expect("output dir");
    let missing = output.path().join("missing.xlsx");
    assert!(generate(&missing, &options(output.path()), &ProgressBar::hidden()).is_err());
}

#[test]
fn empty_folder_is_an_error() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    let err = generate(input.path(), &options(output.path()), &ProgressBar::hidden())
        .expect_err("no workbooks");
    assert!(err.to_string().contains("no workbooks found"));
}

#[test]
fn inspect_reports_normalized_columns() {
    let input = tempfile::tempdir().expect("input dir");
    let workbook = write_file(input.path(), "class_a.csv", CLASS_CSV);

    let previews = inspect(&workbook, HeaderStrategy::Keyword).expect("inspect");

    let sheet = &previews[0].sheets[0];
    assert_eq!(sheet.header_row, Some(0));
    assert_eq!(sheet.table.columns[0], "اسم الطالب");
    assert_eq!(
        sheet.attendance_columns,
        vec![
            "الحضور والغياب الاسبوع الأول".to_string(),
            "الحضور والغياب الاسبوع الثاني".to_string(),
        ]
    );
    assert_eq!(sheet.table.height(), 3);
}

#[test]
fn unreadable_workbook_does_not_stop_the_folder_run() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_file(input.path(), "a.csv", CLASS_CSV);
    write_file(input.path(), "b_broken.xlsx", "not a zip archive");
    write_file(input.path(), "c.csv", CLASS_CSV);

    let result =
        generate(input.path(), &options(output.path()), &ProgressBar::hidden()).expect("generate");

    assert_eq!(result.workbooks.len(), 3);
    assert!(result.has_errors());
    let broken = &result.workbooks[1];
    assert!(broken.path.ends_with("b_broken.xlsx"));
    assert!(broken.sheets.is_empty());
    assert_eq!(broken.errors.len(), 1);
    assert!(result.workbooks[0].errors.is_empty());
    assert!(output.path().join("a").join("a").join("student_1.pdf").is_file());
    assert!(output.path().join("c").join("c").join("student_1.pdf").is_file());
    assert_eq!(result.reports_written(), 4);

    let previews = inspect(input.path(), HeaderStrategy::Marker).expect("inspect");
    assert_eq!(previews.len(), 3);
    assert_eq!(previews[1].errors.len(), 1);
    assert!(previews[1].sheets.is_empty());
    assert_eq!(previews[2].sheets.len(), 1);
}

#[test]
fn workbooks_with_colliding_stems_get_separate_directories() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    // "class." and "class" both sanitize to "class".
    write_file(input.path(), "class..csv", CLASS_CSV);
    write_file(input.path(), "class.csv", CLASS_CSV);

    let result =
        generate(input.path(), &options(output.path()), &ProgressBar::hidden()).expect("generate");

    assert!(!result.has_errors());
    let dirs: Vec<&Path> = result.workbooks.iter().map(|w| w.output_dir.as_path()).collect();
    assert_eq!(dirs, vec![output.path().join("class"), output.path().join("class_1")]);
    for dir in dirs {
        assert!(dir.join("class").join("student_2.pdf").is_file());
        assert!(dir.join("class").join("summary.csv").is_file());
    }
}
