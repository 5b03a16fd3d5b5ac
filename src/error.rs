//! Error types for tree and file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort the processing of a single file or folder.
#[derive(Debug, Error)]
pub enum ReplaceError {
    /// An I/O operation failed on a path.
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The computed rename destination already exists.
    #[error("cannot rename {} to {}: target already exists", .from.display(), .to.display())]
    RenameCollision { from: PathBuf, to: PathBuf },

    /// The file content is not valid in its detected encoding.
    #[error("content of {} is not valid {encoding}", .path.display())]
    Malformed { path: PathBuf, encoding: &'static str },

    /// The replaced text cannot be written back in the file's encoding.
    #[error("replacement text cannot be encoded as {encoding} in {}", .path.display())]
    Unencodable { path: PathBuf, encoding: &'static str },
}

impl ReplaceError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReplaceError>;
