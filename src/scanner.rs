use crate::args::{Args, RunOptions};
use crate::classify::Classifier;
use crate::cleaner;
use crate::error::ReplaceError;
use crate::mover::{self, Mover};
use crate::replacer::Replacer;
use crate::rewriter::{self, RewriteOutcome};
use anyhow::{anyhow, Context, Result};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Counters for one root
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub files: usize,
    pub renamed: usize,
    pub rewritten: usize,
    pub skipped_binary: usize,
    pub folders_removed: usize,
}

impl TreeStats {
    pub fn changed(&self) -> bool {
        self.renamed > 0 || self.rewritten > 0 || self.folders_removed > 0
    }
}

/// Run the replacement over every path given on the command line
///
/// A failing root is reported and the remaining roots are still processed.
///
/// # Arguments
/// * `args` - Command line arguments
///
/// # Returns
/// * `Result<usize>` - Number of roots that failed
pub fn scan_and_replace(args: &Args) -> Result<usize> {
    let replacer = Replacer::new(args.replacement_spec())?;
    let classifier = args.classifier();
    let options = args.run_options();

    let mut failed = 0;
    for root in &args.paths {
        println!("processing {}", root.display());
        match replace_in_tree(root, &replacer, &classifier, &options) {
            Ok(stats) => {
                tracing::debug!(
                    files = stats.files,
                    renamed = stats.renamed,
                    rewritten = stats.rewritten,
                    skipped_binary = stats.skipped_binary,
                    folders_removed = stats.folders_removed,
                    "Finished {}",
                    root.display()
                );
                let active = options.rename_names || options.rewrite_content;
                if active && !stats.changed() {
                    eprintln!("Warning: No replacements were made in {}", root.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed += 1;
            }
        }
    }

    Ok(failed)
}

/// Rename and rewrite every file under one root
///
/// Each folder is listed only when the walk enters it, and its files are
/// handled before its subfolders, so every listing already reflects the
/// renames done so far. The first failing file aborts the root.
///
/// # Arguments
/// * `root` - File or folder to process
/// * `replacer` - Replacement applied to paths and contents
/// * `classifier` - Decides which files are binary
/// * `options` - Enabled modes
///
/// # Returns
/// * `Result<TreeStats>` - What was changed under the root
pub fn replace_in_tree(
    root: &Path,
    replacer: &Replacer,
    classifier: &Classifier,
    options: &RunOptions,
) -> Result<TreeStats> {
    if root.symlink_metadata().is_err() {
        return Err(anyhow!("Path does not exist: {}", root.display()));
    }

    let mover = Mover::for_root(root, options.use_git);
    tracing::debug!("Moving files under {} with {:?}", root.display(), mover);

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .sort_by_file_path(files_first)
        .build();

    let mut stats = TreeStats::default();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Error walking {}: {}", root.display(), err);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        stats.files += 1;

        process_file(path, replacer, classifier, options, mover, &mut stats)
            .with_context(|| format!("Failed to process {}", path.display()))?;
    }

    if options.rename_names {
        stats.folders_removed = cleaner::remove_empty_folders(root)
            .with_context(|| format!("Failed to remove empty folders in {}", root.display()))?;
    }

    Ok(stats)
}

/// Rename a file if needed, then rewrite its content at the final path
fn process_file(
    path: &Path,
    replacer: &Replacer,
    classifier: &Classifier,
    options: &RunOptions,
    mover: Mover,
    stats: &mut TreeStats,
) -> Result<(), ReplaceError> {
    let mut current = path.to_path_buf();

    if options.rename_names {
        if let Some(new_path) = rename_path(path, replacer, mover)? {
            stats.renamed += 1;
            current = new_path;
        }
    }

    if options.rewrite_content {
        match rewriter::rewrite_file(&current, replacer, classifier)? {
            RewriteOutcome::Rewritten => stats.rewritten += 1,
            RewriteOutcome::SkippedBinary => stats.skipped_binary += 1,
            RewriteOutcome::Unchanged => {}
        }
    }

    Ok(())
}

/// Apply the replacement to the whole path and move the file there
///
/// # Returns
/// * `Result<Option<PathBuf>>` - The new path, or None when the name is unchanged
fn rename_path(
    path: &Path,
    replacer: &Replacer,
    mover: Mover,
) -> Result<Option<PathBuf>, ReplaceError> {
    let Some(old) = path.to_str() else {
        tracing::warn!("Not renaming {}: path is not valid UTF-8", path.display());
        return Ok(None);
    };

    let new = replacer.replace(old);
    if new == old {
        return Ok(None);
    }
    let new_path = PathBuf::from(new);

    mover::check_vacant(path, &new_path)?;
    if let Some(parent) = new_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReplaceError::io("create folder", parent, e))?;
    }
    mover.move_path(path, &new_path)?;
    println!("renamed: {} -> {}", path.display(), new_path.display());

    Ok(Some(new_path))
}

/// Files before folders, then by path
fn files_first(a: &Path, b: &Path) -> Ordering {
    a.is_dir().cmp(&b.is_dir()).then_with(|| a.cmp(b))
}
