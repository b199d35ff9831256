//! CLI argument definitions for the attendance report generator.

use std::path::PathBuf;

use attendance_core::HeaderStrategy;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "attendance-reports",
    version,
    about = "Generate per-student attendance reports from spreadsheet workbooks",
    long_about = "Generate one PDF attendance report per student.\n\n\
                  Each worksheet is re-based on its student-name header row, the weekly\n\
                  attendance columns are tallied, and a report is written per row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow student names in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate PDF reports for every sheet of a workbook.
    Generate(GenerateArgs),

    /// Show each sheet's normalized table and attendance columns.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Workbook file (.xlsx, .xls, .ods, .csv, ...) or a folder of workbooks.
    #[arg(value_name = "WORKBOOK")]
    pub input: PathBuf,

    /// Output directory for generated reports.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "generated_docs")]
    pub output_dir: PathBuf,

    /// TOML file with asset paths, page size and labels.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Header detection strategy (overrides the config file).
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Process and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write summary.csv for each sheet.
    #[arg(long = "summary")]
    pub summary: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Workbook file or folder of workbooks.
    #[arg(value_name = "WORKBOOK")]
    pub input: PathBuf,

    /// Number of rows to preview per sheet.
    #[arg(long = "rows", default_value_t = 5)]
    pub rows: usize,

    /// Header detection strategy.
    #[arg(long = "strategy", value_enum, default_value = "marker")]
    pub strategy: StrategyArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Row holding the student-name marker cell.
    Marker,
    /// First row mentioning a weekly attendance keyword.
    Keyword,
}

impl From<StrategyArg> for HeaderStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Marker => Self::Marker,
            StrategyArg::Keyword => Self::Keyword,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
