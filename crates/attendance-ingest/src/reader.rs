//! Workbook reading: one raw table per worksheet.

use std::path::Path;

use attendance_model::{CellValue, Table};
use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Maximum workbook size accepted for loading (100 MB).
pub const MAX_WORKBOOK_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Spreadsheet container formats understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Anything calamine opens: xlsx, xlsm, xlsb, xls, ods.
    Spreadsheet,
    /// A single-sheet comma separated file.
    Csv,
}

impl WorkbookFormat {
    pub const SPREADSHEET_EXTENSIONS: [&'static str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

    /// Picks the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == "csv" {
            Some(Self::Csv)
        } else if Self::SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Spreadsheet)
        } else {
            None
        }
    }
}

/// One worksheet as read from disk, before normalization.
///
/// The first sheet row is used as the provisional header, the rest are
/// data rows. The real header row is located later by the normalizer.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub table: Table,
}

/// Per-sheet read result; a broken sheet does not hide the others.
pub type SheetRead = Result<RawSheet>;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_WORKBOOK_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::file_access(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Reads every sheet of a workbook in workbook order.
///
/// Fails only when the file itself cannot be opened; sheet-level failures
/// are returned in place.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetRead>> {
    let format = WorkbookFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string(),
    })?;
    check_file_size(path)?;
    match format {
        WorkbookFormat::Spreadsheet => read_spreadsheet(path),
        WorkbookFormat::Csv => Ok(vec![read_csv_sheet(path)]),
    }
}

fn read_spreadsheet(path: &Path) -> Result<Vec<SheetRead>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let names = workbook.sheet_names();
    debug!(path = %path.display(), sheets = names.len(), "opened workbook");
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let read = match workbook.worksheet_range(&name) {
            Ok(range) => {
                let grid: Vec<Vec<CellValue>> = range
                    .rows()
                    .map(|row| row.iter().map(convert_cell).collect())
                    .collect();
                Ok(RawSheet {
                    table: grid_to_table(grid),
                    name,
                })
            }
            Err(error) => {
                warn!(sheet = %name, %error, "failed to read sheet");
                Err(IngestError::Sheet {
                    path: path.to_path_buf(),
                    sheet: name,
                    message: error.to_string(),
                })
            }
        };
        sheets.push(read);
    }
    Ok(sheets)
}

fn read_csv_sheet(path: &Path) -> SheetRead {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        grid.push(record.iter().map(CellValue::text).collect());
    }
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("sheet")
        .to_string();
    Ok(RawSheet {
        name,
        table: grid_to_table(grid),
    })
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::String(value) => CellValue::text(value),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        other => CellValue::text(other.to_string()),
    }
}

/// Splits a raw grid into a provisional header row and data rows.
///
/// Blank header cells are named `Unnamed: <index>`.
pub fn grid_to_table(grid: Vec<Vec<CellValue>>) -> Table {
    let mut rows = grid.into_iter();
    let Some(header) = rows.next() else {
        return Table::default();
    };
    let data: Vec<Vec<CellValue>> = rows.collect();
    let width = data
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let columns = (0..width)
        .map(|idx| header_name(header.get(idx), idx))
        .collect();
    Table::from_rows(columns, data)
}

fn header_name(cell: Option<&CellValue>, idx: usize) -> String {
    match cell {
        Some(value) if !value.is_blank() => value.to_text(),
        _ => format!("Unnamed: {idx}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(
            WorkbookFormat::from_path(Path::new("book.XLSX")),
            Some(WorkbookFormat::Spreadsheet)
        );
        assert_eq!(
            WorkbookFormat::from_path(Path::new("book.csv")),
            Some(WorkbookFormat::Csv)
        );
        assert_eq!(WorkbookFormat::from_path(Path::new("book.pdf")), None);
        assert_eq!(WorkbookFormat::from_path(Path::new("book")), None);
    }

    #[test]
    fn grid_first_row_becomes_header() {
        let grid = vec![
            vec![CellValue::text("A"), CellValue::Missing],
            vec![CellValue::text("1"), CellValue::text("2"), CellValue::text("3")],
        ];
        let table = grid_to_table(grid);
        assert_eq!(table.columns, vec!["A", "Unnamed: 1", "Unnamed: 2"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn empty_grid_is_empty_table() {
        let table = grid_to_table(Vec::new());
        assert_eq!(table.width(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn calamine_cells_convert_to_model_cells() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Missing);
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            convert_cell(&Data::String(" x ".to_string())),
            CellValue::text("x")
        );
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Empty);
    }
}
