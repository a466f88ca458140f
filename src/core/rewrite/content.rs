//! Content pass: in-place substring replacement inside file contents.

use memchr::memmem::Finder;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::filter::IgnoreSet;
use super::walk;
use crate::error::{Error, Result};

/// Rewrite every regular file under `root` that contains `search`.
///
/// Directories whose base name equals an ignore entry are skipped with their
/// whole subtree. Returns the number of files modified. The first failure
/// aborts the walk; files already rewritten stay rewritten.
pub fn rewrite_contents(
    root: &Path,
    search: &str,
    replace: &str,
    ignore: &IgnoreSet,
    verbose: bool,
) -> Result<usize> {
    walk::require_search(search)?;
    let finder = Finder::new(search.as_bytes());
    let mut modified = 0;

    let walker = walk::sorted(root)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && ignore.matches_base_name(entry.path())));

    for entry in walker {
        let entry = entry.map_err(|e| walk::walk_error(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        if rewrite_with(entry.path(), &finder, replace.as_bytes())? {
            modified += 1;
            crate::log_verbose!(verbose, "rewrite", "Modified file: {}", entry.path().display());
        }
    }

    Ok(modified)
}

/// Rewrite a single file. Returns `true` when the file was replaced.
///
/// Files that do not contain `search` are left untouched: no write and no
/// permission change.
pub fn rewrite_file(path: &Path, search: &str, replace: &str) -> Result<bool> {
    walk::require_search(search)?;
    rewrite_with(path, &Finder::new(search.as_bytes()), replace.as_bytes())
}

fn rewrite_with(path: &Path, finder: &Finder<'_>, replace: &[u8]) -> Result<bool> {
    let display = path.display().to_string();

    let content = fs::read(path).map_err(|e| read_error(&display, "read", e))?;
    if finder.find(&content).is_none() {
        return Ok(false);
    }

    let permissions = fs::metadata(path)
        .map_err(|e| read_error(&display, "stat", e))?
        .permissions();

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Dropping the temp file on any early return deletes it.
    let mut temp = tempfile::Builder::new()
        .prefix("temp_")
        .tempfile_in(dir)
        .map_err(|e| Error::rewrite_write_failed(&display, "create temp file", e.to_string()))?;

    let mut changed = false;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        for line in content.split_inclusive(|b| *b == b'\n') {
            let result = if finder.find(line).is_some() {
                changed = true;
                writer.write_all(&walk::replace_all(line, finder, replace))
            } else {
                writer.write_all(line)
            };
            result.map_err(|e| Error::rewrite_write_failed(&display, "write temp file", e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| Error::rewrite_write_failed(&display, "flush temp file", e.to_string()))?;
    }

    if !changed {
        return Ok(false);
    }

    temp.as_file()
        .set_permissions(permissions)
        .map_err(|e| Error::rewrite_permission_failed(temp.path().display().to_string(), e.to_string()))?;

    temp.persist(path)
        .map_err(|e| Error::rewrite_write_failed(&display, "replace original", e.error.to_string()))?;

    Ok(true)
}

fn read_error(path: &str, operation: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::rewrite_not_found(path, operation)
    } else {
        Error::rewrite_read_failed(path, operation, err.to_string())
    }
}
