use crate::error::{ReplaceError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How files are moved when their name changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mover {
    /// `git mv`, so the repository records a rename
    Git,
    /// `fs::rename`
    Plain,
}

impl Mover {
    /// Pick the move strategy for a root path
    ///
    /// # Arguments
    /// * `root` - File or folder the run starts from
    /// * `use_git` - Whether `git mv` may be used at all
    pub fn for_root(root: &Path, use_git: bool) -> Self {
        if use_git && is_inside_git_work_tree(root) {
            Mover::Git
        } else {
            Mover::Plain
        }
    }

    /// Move `old` to `new`, refusing to replace anything already at `new`
    ///
    /// The parent folder of `new` must exist.
    pub fn move_path(&self, old: &Path, new: &Path) -> Result<()> {
        check_vacant(old, new)?;

        if *self == Mover::Git && git_mv(old, new) {
            return Ok(());
        }

        fs::rename(old, new).map_err(|e| ReplaceError::io("rename", old, e))
    }
}

/// Fail with `RenameCollision` when something other than `old` exists at `new`
pub fn check_vacant(old: &Path, new: &Path) -> Result<()> {
    if new.symlink_metadata().is_ok() && !is_same_file(old, new) {
        return Err(ReplaceError::RenameCollision {
            from: old.to_path_buf(),
            to: new.to_path_buf(),
        });
    }
    Ok(())
}

/// Check whether a path lives inside a git work tree
pub fn is_inside_git_work_tree(path: &Path) -> bool {
    let dir = if path.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    let output = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output();

    match output {
        Ok(output) => {
            output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
        }
        Err(_) => false,
    }
}

/// Run `git mv`; false when git refuses, e.g. for an untracked file
fn git_mv(old: &Path, new: &Path) -> bool {
    let (Ok(old_abs), Ok(new_abs)) = (std::path::absolute(old), std::path::absolute(new))
    else {
        return false;
    };
    let dir = old_abs
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let output = Command::new("git")
        .arg("mv")
        .arg("-f")
        .arg("--")
        .arg(&old_abs)
        .arg(&new_abs)
        .current_dir(dir)
        .output();

    match output {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            tracing::debug!(
                "git mv {} failed, falling back to rename: {}",
                old.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            tracing::debug!("Failed to run git mv: {}", e);
            false
        }
    }
}

/// Whether two paths name the same directory entry, as in a case-only
/// rename on a case-insensitive filesystem. Symlinks are not followed, so a
/// link at `b` pointing to `a` is a different entry.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    let is_link = |p: &Path| {
        fs::symlink_metadata(p)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(true)
    };
    if is_link(a) || is_link(b) {
        return false;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
