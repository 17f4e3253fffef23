use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ReportcheckError;
use crate::scan::filename::{FilenameParser, ParsedFileName};

/// A file (or the scan root) that could not be turned into a `ParsedFileName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub file_name: String,
    pub error_message: String,
}

impl ErrorReport {
    pub fn new(file_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            error_message: error_message.into(),
        }
    }
}

/// Outcome of one directory scan: parsed records ordered by path plus the
/// files that failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkResult {
    parsed_file_names: Vec<ParsedFileName>,
    errors: Vec<ErrorReport>,
    #[serde(skip)]
    root_failed: bool,
}

impl WalkResult {
    fn root_failure(root: &Path, message: impl Into<String>) -> Self {
        Self {
            parsed_file_names: Vec::new(),
            errors: vec![ErrorReport::new(root.to_string_lossy(), message)],
            root_failed: true,
        }
    }

    /// The single error standing in for the whole scan when the root could
    /// not be read. `None` when the tree was scanned, even if files failed.
    pub fn root_error(&self) -> Option<&ErrorReport> {
        if self.root_failed {
            self.errors.first()
        } else {
            None
        }
    }

    pub fn parsed_file_names(&self) -> &[ParsedFileName] {
        &self.parsed_file_names
    }

    pub fn errors(&self) -> &[ErrorReport] {
        &self.errors
    }

    pub fn into_parts(self) -> (Vec<ParsedFileName>, Vec<ErrorReport>) {
        (self.parsed_file_names, self.errors)
    }
}

/// Drives a `FilenameParser` over every file below a root directory.
pub struct Scanner {
    parser: FilenameParser,
}

impl Scanner {
    pub fn new(parser: FilenameParser) -> Self {
        Self { parser }
    }

    /// Parse one file, turning any failure into an `ErrorReport`.
    pub fn process_file(&self, path: &Path) -> Result<ParsedFileName, ErrorReport> {
        self.parser.parse(path).map_err(|e| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
            ErrorReport::new(file_name, e.to_string())
        })
    }

    /// Recursively scan `root`.
    ///
    /// Files are processed in ascending path order so the output does not
    /// depend on the order the filesystem returns entries in. A failing file
    /// only produces an error entry; a failure to enumerate the tree replaces
    /// the whole result with a single error for `root`.
    pub fn walk(&self, root: &Path) -> WalkResult {
        if !root.is_dir() {
            log::warn!("Not a directory: {}", root.display());
            return WalkResult::root_failure(root, "Provided path is not a directory");
        }

        let mut files = match discover_report_files(root) {
            Ok(files) => files,
            Err(e) => {
                let failure = ReportcheckError::DirectoryReadFailure {
                    path: root.display().to_string(),
                    message: e.to_string(),
                };
                log::error!("{}", failure);
                return WalkResult::root_failure(root, failure.to_string());
            }
        };
        files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));

        let mut result = WalkResult::default();
        for path in &files {
            match self.process_file(path) {
                Ok(parsed) => {
                    log::debug!("✓ {} → {} {} {}", path.display(), parsed.ico, parsed.report_date, parsed.insurer);
                    result.parsed_file_names.push(parsed);
                }
                Err(report) => {
                    log::debug!("✗ {}: {}", path.display(), report.error_message);
                    result.errors.push(report);
                }
            }
        }

        log::info!(
            "Scanned {} files in {} (parsed: {}, errors: {})",
            files.len(),
            root.display(),
            result.parsed_file_names.len(),
            result.errors.len()
        );
        result
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(FilenameParser::new())
    }
}

/// Scan `root` with the tolerant default parser.
pub fn walk(root: &Path) -> WalkResult {
    Scanner::default().walk(root)
}

/// Every regular file below `root`. Any unreadable entry fails the whole
/// enumeration.
fn discover_report_files(root: &Path) -> walkdir::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insurer::Insurer;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_sorted_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("VZP");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("c_10000003_VZP_2025_11.pdf"), b"c").unwrap();
        fs::write(dir.join("a_10000001_VZP_2025_11.pdf"), b"a").unwrap();
        fs::write(dir.join("b_10000002_VZP_2025_11.pdf"), b"b").unwrap();

        let result = walk(temp_dir.path());
        assert!(result.errors().is_empty());
        let icos: Vec<&str> = result.parsed_file_names().iter().map(|p| p.ico.as_str()).collect();
        assert_eq!(icos, vec!["10000001", "10000002", "10000003"]);
        assert!(result.parsed_file_names().iter().all(|p| !p.invalid_directory));
    }

    #[test]
    fn test_walk_nested_and_failing_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("2025/OZP")).unwrap();
        fs::write(root.join("2025/OZP/10751416_OZP_2025_11.pdf"), b"x").unwrap();
        fs::write(root.join("2025/OZP/PPPZ-12345678-OZP.pdf"), b"x").unwrap();
        fs::write(root.join("notes.txt"), b"x").unwrap();

        let result = walk(root);
        assert!(result.root_error().is_none());
        // one record per file: either parsed or an error
        assert_eq!(result.parsed_file_names().len() + result.errors().len(), 3);
        assert_eq!(result.parsed_file_names().len(), 1);

        let parsed = &result.parsed_file_names()[0];
        assert_eq!(parsed.insurer, Insurer::Ozp);
        assert_eq!(parsed.report_date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(parsed.parent_dir_name, "OZP");

        let missing_date = result
            .errors()
            .iter()
            .find(|e| e.file_name == "PPPZ-12345678-OZP.pdf")
            .unwrap();
        assert!(missing_date.error_message.contains("year-month information"));
        assert!(result.errors().iter().any(|e| e.file_name == "notes.txt"));
    }

    #[test]
    fn test_walk_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("does-not-exist");
        let result = walk(&root);
        assert!(result.parsed_file_names().is_empty());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].file_name, root.to_string_lossy());
        assert!(result.errors()[0].error_message.contains("not a directory"));
        assert!(result.root_error().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_unreadable_subdirectory_aborts() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("VZP")).unwrap();
        fs::write(root.join("VZP/10751416_VZP_2025_11.pdf"), b"x").unwrap();
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits; nothing to observe then
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = walk(root);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.parsed_file_names().is_empty());
        assert_eq!(result.errors().len(), 1);
        let error = result.root_error().unwrap();
        assert_eq!(error.file_name, root.to_string_lossy());
        assert!(error.error_message.starts_with("Failed to read directory"));
    }

    #[test]
    fn test_walk_root_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("10751416_VZP_2025_11.pdf");
        fs::write(&file, b"x").unwrap();
        let result = walk(&file);
        assert!(result.parsed_file_names().is_empty());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_walk_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let (parsed, errors) = walk(temp_dir.path()).into_parts();
        assert!(parsed.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_process_file_reports_file_name() {
        let scanner = Scanner::default();
        let report = scanner.process_file(Path::new("/tmp/VZP/short.pdf")).unwrap_err();
        assert_eq!(report.file_name, "short.pdf");
        assert!(report.error_message.contains("fewer than 3 segments"));
    }
}
