//! Workbook discovery for input folders.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::reader::WorkbookFormat;

/// Lists every readable workbook in a directory, sorted by file name.
///
/// Office lock files (`~$book.xlsx`) are skipped.
pub fn list_workbook_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if is_lock_file {
            continue;
        }
        if WorkbookFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Resolves a CLI input: a workbook file is returned as-is, a directory is
/// expanded to the workbooks it contains.
pub fn resolve_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        list_workbook_files(input)
    } else if input.is_file() {
        Ok(vec![input.to_path_buf()])
    } else {
        Err(IngestError::FileNotFound {
            path: input.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        for name in ["b.xlsx", "a.csv", "notes.txt", "~$b.xlsx"] {
            std::fs::write(dir.path().join(name), "x").expect("write file");
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).expect("create dir");
        dir
    }

    #[test]
    fn test_list_workbook_files_filters_and_sorts() {
        let dir = create_test_dir();
        let files = list_workbook_files(dir.path()).expect("list files");
        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();
        assert_eq!(names, vec!["a.csv", "b.xlsx"]);
    }

    #[test]
    fn test_list_workbook_files_missing_dir() {
        let result = list_workbook_files(Path::new("/nonexistent/attendance"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_resolve_inputs_file_and_dir() {
        let dir = create_test_dir();
        let file = dir.path().join("b.xlsx");
        assert_eq!(resolve_inputs(&file).expect("file input"), vec![file]);
        assert_eq!(resolve_inputs(dir.path()).expect("dir input").len(), 2);
        assert!(resolve_inputs(&dir.path().join("missing.xlsx")).is_err());
    }
}
