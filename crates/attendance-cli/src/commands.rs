use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use attendance_cli::logging::LogFormat;
use attendance_cli::pipeline::{GenerateOptions, RunResult, generate, inspect};
use attendance_report::ReportConfig;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use crate::cli::{GenerateArgs, InspectArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell, sheet_row_number};

pub fn run_generate(args: &GenerateArgs, log_format: LogFormat) -> Result<RunResult> {
    let span = info_span!("generate", input = %args.input.display());
    let _guard = span.enter();

    let mut config = match &args.config {
        Some(path) => {
            ReportConfig::load(path).with_context(|| format!("load config {}", path.display()))?
        }
        None => ReportConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.header_strategy = strategy.into();
    }
    info!(
        strategy = %config.header_strategy,
        page_size = %config.page_size,
        output = %args.output_dir.display(),
        dry_run = args.dry_run,
        "starting report generation"
    );

    let options = GenerateOptions {
        output_dir: args.output_dir.clone(),
        config,
        dry_run: args.dry_run,
        write_summary: args.summary,
    };
    let progress = progress_bar(log_format);
    generate(&args.input, &options, &progress)
}

fn progress_bar(log_format: LogFormat) -> ProgressBar {
    if log_format == LogFormat::Json || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len} rows")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let previews = inspect(&args.input, args.strategy.into())?;
    for preview in previews {
        println!("Workbook: {}", preview.path.display());
        for sheet in &preview.sheets {
            println!();
            match sheet.header_row {
                Some(row) => println!(
                    "Sheet: {} (header on sheet row {})",
                    sheet.name,
                    sheet_row_number(row)
                ),
                None => println!("Sheet: {} (no header row found)", sheet.name),
            }
            let mut table = Table::new();
            table.set_header(sheet.table.columns.iter().map(|name| header_cell(name)));
            apply_table_style(&mut table);
            for row in sheet.table.rows.iter().take(args.rows) {
                table.add_row(row.iter().map(|cell| {
                    if cell.is_blank() {
                        dim_cell("-")
                    } else {
                        Cell::new(cell)
                    }
                }));
            }
            println!("{table}");
            println!(
                "{} rows, {} columns",
                sheet.table.height(),
                sheet.table.width()
            );
            if sheet.attendance_columns.is_empty() {
                println!("Attendance columns: none");
            } else {
                println!("Attendance columns: {}", sheet.attendance_columns.join(", "));
            }
        }
        for error in &preview.errors {
            eprintln!("- {error}");
        }
    }
    Ok(())
}
