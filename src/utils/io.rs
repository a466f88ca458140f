//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents, mapping failures to `internal.io_error`.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Create a directory and all parents.
pub fn ensure_dir(path: &Path, operation: &str) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        Error::internal_io(
            format!("{}: {}", path.display(), e),
            Some(operation.to_string()),
        )
    })
}

/// Require `path` to be an existing directory.
pub fn require_dir(path: &Path, field: &str) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::validation_invalid_argument(
            field,
            format!("Directory not found: {}", path.display()),
            None,
            None,
        ))
    }
}
