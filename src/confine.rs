//! Path confinement guard
//!
//! Proves that a candidate source file lives under a reference directory
//! after resolving symlinks on both sides. This is the defense against a
//! symlink placed inside the working directory that points outside it: the
//! literal path looks local, the canonical path does not.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfineError {
    /// The candidate could not be opened for reading.
    #[error("cannot open source file: {0}")]
    NotFound(#[source] io::Error),
    /// The canonical candidate path is not under the canonical reference
    /// directory.
    #[error("path resolves outside the working directory")]
    PathEscape,
    /// Canonicalization of either path failed.
    #[error("path resolution failed: {0}")]
    Io(#[from] io::Error),
}

/// Open `source` for reading and prove its canonical path sits under the
/// canonical form of `reference_dir`.
///
/// The open handle is returned together with the canonical path and stays
/// open for the transfer; the reference directory is only touched within this
/// call. The containment test is component-wise (`Path::starts_with`), so
/// `/data2` is not treated as inside `/data`.
pub fn confine(source: &Path, reference_dir: &Path) -> Result<(File, PathBuf), ConfineError> {
    let file = File::open(source).map_err(ConfineError::NotFound)?;

    let canonical_source = source.canonicalize()?;
    let canonical_root = reference_dir.canonicalize()?;

    if !canonical_source.starts_with(&canonical_root) {
        return Err(ConfineError::PathEscape);
    }
    Ok((file, canonical_source))
}
