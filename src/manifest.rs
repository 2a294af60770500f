//! Gemfile discovery.
//!
//! Mirrors bundler's own lookup: a path naming a file is used as-is,
//! otherwise the search walks from the directory up to the filesystem root
//! and takes the first `Gemfile` it sees.

use std::path::{Path, PathBuf};

use crate::error::{GemsyncError, Result};

/// File name bundler looks for.
pub const MANIFEST_NAME: &str = "Gemfile";

/// Resolve the Gemfile bundler would use for `path`.
///
/// Returns `Ok(None)` when no Gemfile exists anywhere above `path`; bundler
/// then reports the problem itself. A nonexistent `path` is an error rather
/// than a starting point for the search.
pub fn resolve_manifest_path(path: &Path) -> Result<Option<PathBuf>> {
    let path = std::path::absolute(path)?;

    if path.is_file() {
        return Ok(Some(path));
    }

    if !path.is_dir() {
        return Err(GemsyncError::PathNotFound { path });
    }

    Ok(find_manifest_upward(&path, MANIFEST_NAME))
}

/// Walk from `start` to the root, returning the first regular file named
/// `file_name`. Directories with that name are skipped.
pub fn find_manifest_upward(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            tracing::debug!("Found {} at {}", file_name, candidate.display());
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}
