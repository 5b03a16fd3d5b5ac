use crate::error::{ReplaceError, Result};
use std::fs;
use std::path::Path;

/// Recursively remove folders that are empty, `path` included
///
/// Subfolders are pruned first, so a folder holding only empty folders is
/// removed as well. Symlinks and `.git` folders are never entered.
///
/// # Arguments
/// * `path` - Folder to prune; anything else is left alone
///
/// # Returns
/// * `Result<usize>` - Number of folders removed
pub fn remove_empty_folders(path: &Path) -> Result<usize> {
    let is_dir = fs::symlink_metadata(path).map(|meta| meta.is_dir()).unwrap_or(false);
    if !is_dir {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(path).map_err(|e| ReplaceError::io("list", path, e))? {
        let entry = entry.map_err(|e| ReplaceError::io("list", path, e))?;
        let is_subdir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        if is_subdir && entry.file_name() != ".git" {
            removed += remove_empty_folders(&entry.path())?;
        }
    }

    let is_empty = fs::read_dir(path)
        .map_err(|e| ReplaceError::io("list", path, e))?
        .next()
        .is_none();
    if is_empty {
        println!("removing empty folder: {}", path.display());
        fs::remove_dir(path).map_err(|e| ReplaceError::io("remove folder", path, e))?;
        removed += 1;
    }

    Ok(removed)
}
