//! Insurer folder lookup and file relocation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ReportcheckError, Result};
use crate::insurer::Insurer;
use crate::normalize::{normalize, token_sequence_contains};
use crate::scan::ParsedFileName;

/// A file moved out of a folder that does not name its insurer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
    pub insurer: Insurer,
}

/// First directory below `root` (depth-first, names sorted) whose normalized
/// name contains one of the insurer's normalized aliases as a token run.
pub fn find_folder(root: &Path, insurer: Insurer) -> Result<Option<PathBuf>> {
    let aliases: Vec<String> = insurer.aliases().iter().map(|a| normalize(a)).collect();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ReportcheckError::DirectoryReadFailure {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir_name = normalize(&entry.file_name().to_string_lossy());
        if aliases.iter().any(|alias| token_sequence_contains(&dir_name, alias)) {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

/// The insurer's existing folder, or a new one named after the insurer.
pub fn ensure_folder(root: &Path, insurer: Insurer) -> Result<PathBuf> {
    if let Some(existing) = find_folder(root, insurer)? {
        return Ok(existing);
    }
    let folder = root.join(insurer.display_name());
    fs::create_dir_all(&folder)?;
    log::info!("Created folder {} for {}", folder.display(), insurer);
    Ok(folder)
}

/// Move `file` into `target_dir`, replacing a same-named file there.
pub fn move_file(file: &Path, target_dir: &Path) -> Result<PathBuf> {
    let file_name = file.file_name().ok_or_else(|| {
        ReportcheckError::InvalidInput(format!("Not a file path: {}", file.display()))
    })?;
    fs::create_dir_all(target_dir)?;
    let destination = target_dir.join(file_name);

    // rename replaces an existing destination; copying is only for moves
    // across filesystems
    if let Err(e) = fs::rename(file, &destination) {
        if !is_cross_device(&e) {
            return Err(e.into());
        }
        fs::copy(file, &destination)?;
        fs::remove_file(file)?;
    }

    log::debug!("Moved {} → {}", file.display(), destination.display());
    Ok(destination)
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    // EXDEV
    e.raw_os_error() == Some(18)
}

#[cfg(windows)]
fn is_cross_device(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_: &io::Error) -> bool {
    false
}

/// Files that sit in the wrong folder and whose insurer was read from the
/// name. Files attributed by the tolerant fallback are left where they are.
pub fn misplaced(parsed_files: &[ParsedFileName]) -> impl Iterator<Item = &ParsedFileName> {
    parsed_files
        .iter()
        .filter(|p| p.invalid_directory && !p.insurer_defaulted)
}

/// Move every misplaced file into its insurer's folder under `root`. Stops
/// at the first failure; moves already done stay.
pub fn relocate_misplaced(root: &Path, parsed_files: &[ParsedFileName]) -> Result<Vec<Relocation>> {
    let mut relocations = Vec::new();
    for parsed in misplaced(parsed_files) {
        let target_dir = ensure_folder(root, parsed.insurer)?;
        let from = PathBuf::from(&parsed.file_path);
        let to = move_file(&from, &target_dir)?;
        relocations.push(Relocation {
            from,
            to,
            insurer: parsed.insurer,
        });
    }
    log::info!("Relocated {} misplaced files under {}", relocations.len(), root.display());
    Ok(relocations)
}
