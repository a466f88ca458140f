//! Input validation primitives.

use crate::error::{Error, Result};

/// Require a collection to be non-empty.
pub fn require_non_empty_vec<'a, T>(vec: &'a [T], field: &str, message: &str) -> Result<&'a [T]> {
    if vec.is_empty() {
        Err(Error::validation_missing_argument(vec![field.to_string()]).with_hint(message))
    } else {
        Ok(vec)
    }
}

/// Split a comma-separated CLI list, dropping blanks.
///
/// `"a, b,,c"` becomes `["a", "b", "c"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_vec_reports_missing_argument() {
        let empty: Vec<String> = Vec::new();
        let err = require_non_empty_vec(&empty, "rule", "Pass --rule search=replace").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
