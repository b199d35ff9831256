use attendance_cli::pipeline::RunResult;
use attendance_core::{SheetOutcome, SheetSummary};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    if result.dry_run {
        println!("Dry run: no files written");
    }
    let mut total_rows = 0usize;
    let mut total_students = 0usize;
    let mut total_written = 0usize;
    for workbook in &result.workbooks {
        println!();
        println!("Workbook: {}", workbook.path.display());
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Sheet"),
            header_cell("Header row"),
            header_cell("Rows"),
            header_cell("Attendance columns"),
            header_cell("Students"),
            header_cell("Reports"),
            header_cell("Unrecognized"),
            header_cell("Status"),
        ]);
        apply_summary_table_style(&mut table);
        for index in [1, 2, 3, 4, 5, 6] {
            align_column(&mut table, index, CellAlignment::Right);
        }
        for sheet in &workbook.sheets {
            total_rows += sheet.rows;
            total_students += sheet.students.len();
            total_written += sheet.reports_written();
            table.add_row(vec![
                Cell::new(&sheet.name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                sheet
                    .header_row
                    .map_or_else(|| dim_cell("-"), |row| Cell::new(sheet_row_number(row))),
                Cell::new(sheet.rows),
                count_cell(sheet.attendance_columns.len(), Color::Reset),
                Cell::new(sheet.students.len()),
                Cell::new(sheet.reports_written()),
                count_cell(sheet.unrecognized_values.len(), Color::Yellow),
                status_cell(sheet),
            ]);
        }
        println!("{table}");
        for file in &workbook.summary_files {
            println!("Summary: {}", file.display());
        }
        if !workbook.errors.is_empty() {
            eprintln!("Errors:");
            for error in &workbook.errors {
                eprintln!("- {error}");
            }
        }
    }
    println!();
    println!(
        "Total: {total_rows} rows, {total_students} students, {total_written} reports written"
    );
}

fn status_cell(sheet: &SheetSummary) -> Cell {
    match &sheet.outcome {
        SheetOutcome::Completed => Cell::new("ok")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        SheetOutcome::Skipped { reason } => Cell::new(format!("skipped: {}", reason.message()))
            .fg(Color::Yellow),
        SheetOutcome::Failed { message } => Cell::new(format!("failed: {message}"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// 1-based sheet row of a raw data row; the first sheet row is the
/// provisional header, so data row 0 is sheet row 2.
pub fn sheet_row_number(row: usize) -> usize {
    row + 2
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
