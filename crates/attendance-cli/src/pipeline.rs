//! Workbook processing shared by the `generate` and `inspect` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use attendance_core::{
    HeaderLocator, HeaderStrategy, NullRenderer, PreparedSheet, ReportRenderer, SheetOutcome,
    SheetSummary, StudentReport, deduplicate, prepare_sheet, process_sheet,
};
use attendance_ingest::{read_workbook, resolve_inputs};
use attendance_report::{PdfRenderer, ReportConfig, sanitize_component, write_summary_file};
use indicatif::ProgressBar;
use tracing::{info, info_span, trace, warn};

use crate::logging::redact_value;

/// Settings for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_dir: PathBuf,
    pub config: ReportConfig,
    /// Process everything but write no files.
    pub dry_run: bool,
    /// Write `summary.csv` next to each sheet's reports.
    pub write_summary: bool,
}

#[derive(Debug)]
pub struct WorkbookResult {
    pub path: PathBuf,
    pub output_dir: PathBuf,
    pub sheets: Vec<SheetSummary>,
    pub summary_files: Vec<PathBuf>,
    /// Workbooks or sheets that could not be read, and summary export
    /// failures.
    pub errors: Vec<String>,
}

impl WorkbookResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.sheets.iter().any(|sheet| sheet.outcome.is_failure())
    }

    pub fn reports_written(&self) -> usize {
        self.sheets.iter().map(SheetSummary::reports_written).sum()
    }
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub workbooks: Vec<WorkbookResult>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.workbooks.iter().any(WorkbookResult::has_errors)
    }

    pub fn reports_written(&self) -> usize {
        self.workbooks.iter().map(WorkbookResult::reports_written).sum()
    }
}

/// Generates reports for a workbook file or every workbook in a directory.
///
/// A single workbook writes to `<output>/<sheet>/`; a directory of
/// workbooks nests each one under its file stem. A workbook that cannot be
/// opened is recorded in its [`WorkbookResult::errors`] and the run moves on.
pub fn generate(input: &Path, options: &GenerateOptions, progress: &ProgressBar) -> Result<RunResult> {
    let inputs =
        resolve_inputs(input).with_context(|| format!("resolve input {}", input.display()))?;
    if inputs.is_empty() {
        bail!("no workbooks found in {}", input.display());
    }
    let nested = input.is_dir();
    let locator = options.config.header_strategy.locator();
    let mut renderer = (!options.dry_run)
        .then(|| PdfRenderer::new(options.config.clone(), options.output_dir.clone()));

    let stems: Vec<String> = inputs.iter().map(|path| workbook_stem(path)).collect();
    let stems = deduplicate(&stems);

    let mut workbooks = Vec::with_capacity(inputs.len());
    for (path, stem) in inputs.into_iter().zip(stems) {
        let output_dir = if nested {
            options.output_dir.join(stem)
        } else {
            options.output_dir.clone()
        };
        if let Some(renderer) = renderer.as_mut() {
            renderer.set_output_dir(output_dir.clone());
        }
        let result = generate_workbook(
            &path,
            output_dir,
            options,
            renderer.as_mut(),
            locator.as_ref(),
            progress,
        );
        workbooks.push(result);
    }
    progress.finish_and_clear();

    Ok(RunResult {
        output_dir: options.output_dir.clone(),
        dry_run: options.dry_run,
        workbooks,
    })
}

fn generate_workbook(
    path: &Path,
    output_dir: PathBuf,
    options: &GenerateOptions,
    mut renderer: Option<&mut PdfRenderer>,
    locator: &dyn HeaderLocator,
    progress: &ProgressBar,
) -> WorkbookResult {
    let span = info_span!("workbook", path = %path.display());
    let _guard = span.enter();
    let mut result = WorkbookResult {
        path: path.to_path_buf(),
        output_dir,
        sheets: Vec::new(),
        summary_files: Vec::new(),
        errors: Vec::new(),
    };
    let sheets = match read_workbook(path) {
        Ok(sheets) => sheets,
        Err(error) => {
            warn!(%error, "skipping unreadable workbook");
            result.errors.push(error.to_string());
            return result;
        }
    };
    info!(sheets = sheets.len(), strategy = locator.name(), "processing workbook");

    for sheet in sheets {
        let raw = match sheet {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "skipping unreadable sheet");
                result.errors.push(error.to_string());
                continue;
            }
        };
        let sheet_span = info_span!("sheet", sheet = %raw.name);
        let _sheet_guard = sheet_span.enter();
        let prepared = prepare_sheet(&raw.name, &raw.table, locator);

        progress.set_length(prepared.table.height() as u64);
        progress.set_position(0);
        progress.set_message(prepared.name.clone());
        let summary = match renderer.as_deref_mut() {
            Some(pdf) => process_sheet(&prepared, Progress::new(pdf, progress)),
            None => process_sheet(&prepared, Progress::new(NullRenderer, progress)),
        };

        if let Some(pdf) = renderer.as_deref()
            && options.write_summary
            && summary.outcome == SheetOutcome::Completed
        {
            let dir = pdf.sheet_dir(&summary.name);
            match write_summary_file(&dir, &summary) {
                Ok(file) => result.summary_files.push(file),
                Err(error) => {
                    warn!(%error, "failed to write sheet summary");
                    result.errors.push(format!("{}: {error}", summary.name));
                }
            }
        }
        result.sheets.push(summary);
    }
    result
}

/// Renderer decorator that advances the progress bar per student.
struct Progress<'p, R> {
    inner: R,
    bar: &'p ProgressBar,
}

impl<'p, R> Progress<'p, R> {
    fn new(inner: R, bar: &'p ProgressBar) -> Self {
        Self { inner, bar }
    }
}

impl<R: ReportRenderer> ReportRenderer for Progress<'_, R> {
    type Error = R::Error;

    fn begin_sheet(&mut self, sheet: &str) -> Result<(), Self::Error> {
        self.inner.begin_sheet(sheet)
    }

    fn render(&mut self, report: &StudentReport<'_>) -> Result<Option<PathBuf>, Self::Error> {
        trace!(
            index = report.index,
            student = redact_value(&report.name),
            present = report.tally.present,
            absent = report.tally.absent,
            "rendering report"
        );
        let output = self.inner.render(report);
        self.bar.inc(1);
        output
    }
}

fn workbook_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_component(&stem)
}

/// Normalized sheets of one workbook, for previewing.
#[derive(Debug)]
pub struct WorkbookPreview {
    pub path: PathBuf,
    pub sheets: Vec<PreparedSheet>,
    pub errors: Vec<String>,
}

/// Reads and normalizes every sheet without rendering anything.
pub fn inspect(input: &Path, strategy: HeaderStrategy) -> Result<Vec<WorkbookPreview>> {
    let inputs =
        resolve_inputs(input).with_context(|| format!("resolve input {}", input.display()))?;
    let locator = strategy.locator();
    let mut previews = Vec::with_capacity(inputs.len());
    for path in inputs {
        let mut preview = WorkbookPreview {
            path,
            sheets: Vec::new(),
            errors: Vec::new(),
        };
        let sheets = match read_workbook(&preview.path) {
            Ok(sheets) => sheets,
            Err(error) => {
                warn!(path = %preview.path.display(), %error, "skipping unreadable workbook");
                preview.errors.push(error.to_string());
                previews.push(preview);
                continue;
            }
        };
        for sheet in sheets {
            match sheet {
                Ok(raw) => preview
                    .sheets
                    .push(prepare_sheet(&raw.name, &raw.table, locator.as_ref())),
                Err(error) => preview.errors.push(error.to_string()),
            }
        }
        previews.push(preview);
    }
    Ok(previews)
}
