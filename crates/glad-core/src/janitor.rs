use std::path::Path;

use glob::glob;
use tracing::debug;

use crate::error::Result;

/// Delete every file matching `pattern` and return how many were removed.
///
/// Matches are collected before anything is deleted. A file that vanishes
/// between listing and removal is an error.
pub fn delete_matching(pattern: &str) -> Result<usize> {
    let files: Vec<_> = glob(pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    for file in &files {
        std::fs::remove_file(file)?;
    }
    debug!(pattern, deleted = files.len(), "Deleted local files");
    Ok(files.len())
}

/// Delete a single intermediate file.
pub fn delete_file(path: &Path) -> Result<()> {
    std::fs::remove_file(path)?;
    debug!(path = %path.display(), "Deleted intermediate");
    Ok(())
}

/// Human-readable summary of a deletion count.
pub fn deletion_message(count: usize) -> String {
    format!("{count} files deleted")
}
