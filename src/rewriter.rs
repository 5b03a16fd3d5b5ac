use crate::classify::Classifier;
use crate::encoding::{self, TextEncoding};
use crate::error::{ReplaceError, Result};
use crate::replacer::Replacer;
use std::fs;
use std::path::Path;

/// What happened to a file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Content changed and was written back
    Rewritten,
    /// Nothing to replace
    Unchanged,
    /// Binary file, content not touched
    SkippedBinary,
}

/// Replace content in a single file, keeping its encoding
///
/// # Arguments
/// * `path` - File to rewrite
/// * `replacer` - Replacement to apply
/// * `classifier` - Decides which files are binary
///
/// # Returns
/// * `Result<RewriteOutcome>` - What was done to the file
pub fn rewrite_file(
    path: &Path,
    replacer: &Replacer,
    classifier: &Classifier,
) -> Result<RewriteOutcome> {
    let is_binary = classifier
        .is_binary(path)
        .map_err(|e| ReplaceError::io("classify", path, e))?;
    if is_binary {
        println!("skipping binary file: {}", path.display());
        return Ok(RewriteOutcome::SkippedBinary);
    }
    println!("replacing in file: {}", path.display());

    let bytes = fs::read(path).map_err(|e| ReplaceError::io("read", path, e))?;
    let encoding = encoding::detect_encoding(&bytes).unwrap_or_else(|| {
        tracing::debug!("No encoding detected for {}, using UTF-8", path.display());
        TextEncoding::default()
    });

    let content = encoding.decode(&bytes).ok_or_else(|| ReplaceError::Malformed {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })?;
    let replaced = replacer.replace(&content);
    if replaced == content {
        return Ok(RewriteOutcome::Unchanged);
    }

    let out = encoding.encode(&replaced).ok_or_else(|| ReplaceError::Unencodable {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })?;
    fs::write(path, out).map_err(|e| ReplaceError::io("write", path, e))?;
    tracing::debug!(
        "Wrote {} as {}{}",
        path.display(),
        encoding.name(),
        if encoding.has_bom() { " with BOM" } else { "" }
    );

    Ok(RewriteOutcome::Rewritten)
}
