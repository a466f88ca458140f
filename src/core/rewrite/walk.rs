//! Traversal and rename primitives shared by the rewrite passes.

use memchr::memmem::Finder;
use std::fs::{self, Permissions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Depth-first walker that never follows symlinks.
///
/// Sorting makes walkdir read each directory listing in full before yielding
/// its children, so renames and temp files created during a pass never show up
/// in the same pass.
pub(crate) fn sorted(root: &Path) -> WalkDir {
    WalkDir::new(root).follow_links(false).sort_by_file_name()
}

/// Reject empty search strings before any pass touches the tree.
pub(crate) fn require_search(search: &str) -> Result<()> {
    if search.is_empty() {
        return Err(Error::validation_invalid_argument(
            "search",
            "Search string cannot be empty",
            None,
            None,
        ));
    }
    Ok(())
}

pub(crate) fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err
        .path()
        .unwrap_or(root)
        .display()
        .to_string();
    let not_found = err
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);

    if not_found {
        Error::rewrite_not_found(path, "walk")
    } else {
        Error::rewrite_read_failed(path, "walk", err.to_string())
    }
}

/// Replace every non-overlapping occurrence of the finder's needle.
pub(crate) fn replace_all(haystack: &[u8], finder: &Finder<'_>, replace: &[u8]) -> Vec<u8> {
    let needle_len = finder.needle().len();
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;

    for pos in finder.find_iter(haystack) {
        out.extend_from_slice(&haystack[last..pos]);
        out.extend_from_slice(replace);
        last = pos + needle_len;
    }
    out.extend_from_slice(&haystack[last..]);

    out
}

/// Compute the renamed sibling path for an entry whose base name contains `search`.
///
/// Returns `None` when the name is not valid UTF-8 or does not contain `search`.
pub(crate) fn substituted_path(path: &Path, search: &str, replace: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    if !name.contains(search) {
        return None;
    }
    let new_name = name.replace(search, replace);
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    Some(parent.join(new_name))
}

pub(crate) fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Rename without overwriting an existing destination.
pub(crate) fn rename_no_clobber(from: &Path, to: &Path) -> Result<()> {
    if to.file_name().is_none() || to == from.parent().unwrap_or(to) {
        return Err(Error::validation_invalid_argument(
            "replace",
            format!("Renaming {} would produce an empty name", from.display()),
            None,
            None,
        ));
    }

    if exists(to) {
        return Err(Error::rewrite_collision(
            from.display().to_string(),
            to.display().to_string(),
        ));
    }

    fs::rename(from, to).map_err(|e| {
        let operation = format!("rename to {}", to.display());
        if e.kind() == io::ErrorKind::NotFound {
            Error::rewrite_not_found(from.display().to_string(), operation)
        } else {
            Error::rewrite_write_failed(from.display().to_string(), operation, e.to_string())
        }
    })
}

pub(crate) fn restore_permissions(path: &Path, permissions: Permissions) -> Result<()> {
    fs::set_permissions(path, permissions)
        .map_err(|e| Error::rewrite_permission_failed(path.display().to_string(), e.to_string()))
}
