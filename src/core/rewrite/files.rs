//! File-rename pass.

use std::path::Path;

use super::filter::IgnoreSet;
use super::walk;
use crate::error::{Error, Result};

/// Rename every non-directory entry whose base name contains `search`.
///
/// Directories whose path ends with an ignore entry are skipped with their
/// subtree. Every occurrence in the base name is replaced; the parent stays the
/// same. An existing destination is a collision, never overwritten. Returns
/// the number of files renamed.
pub fn rename_files(
    root: &Path,
    search: &str,
    replace: &str,
    ignore: &IgnoreSet,
    verbose: bool,
) -> Result<usize> {
    walk::require_search(search)?;
    let mut renamed = 0;

    let walker = walk::sorted(root)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && ignore.matches_path_suffix(entry.path())));

    for entry in walker {
        let entry = entry.map_err(|e| walk::walk_error(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let Some(new_path) = walk::substituted_path(entry.path(), search, replace) else {
            continue;
        };

        crate::log_verbose!(
            verbose,
            "rewrite",
            "Renaming file: {} -> {}",
            entry.path().display(),
            new_path.display()
        );

        let metadata = entry.metadata().map_err(|e| {
            Error::rewrite_read_failed(entry.path().display().to_string(), "stat", e.to_string())
        })?;

        walk::rename_no_clobber(entry.path(), &new_path)?;

        // Symlink modes are not meaningful, and chmod would follow the link.
        if !entry.path_is_symlink() {
            walk::restore_permissions(&new_path, metadata.permissions())?;
        }

        renamed += 1;
    }

    Ok(renamed)
}
