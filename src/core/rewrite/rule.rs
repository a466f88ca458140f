use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single (search, replace) pair applied tree-wide.
///
/// Rules are immutable once built. `search` is never empty: an empty needle
/// would match every position of every file and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRewriteRule")]
pub struct RewriteRule {
    search: String,
    replace: String,
}

#[derive(Deserialize)]
struct RawRewriteRule {
    search: String,
    #[serde(default)]
    replace: String,
}

impl TryFrom<RawRewriteRule> for RewriteRule {
    type Error = String;

    fn try_from(raw: RawRewriteRule) -> std::result::Result<Self, Self::Error> {
        if raw.search.is_empty() {
            return Err("rewrite rule has an empty search string".to_string());
        }
        Ok(Self {
            search: raw.search,
            replace: raw.replace,
        })
    }
}

impl RewriteRule {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Result<Self> {
        let search = search.into();
        if search.is_empty() {
            return Err(Error::validation_invalid_argument(
                "search",
                "Search string cannot be empty",
                None,
                None,
            ));
        }
        Ok(Self {
            search,
            replace: replace.into(),
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replace(&self) -> &str {
        &self.replace
    }

    /// Parse the CLI form `search=replace` (split at the first `=`).
    pub fn parse(raw: &str) -> Result<Self> {
        let (search, replace) = raw.split_once('=').ok_or_else(|| {
            Error::validation_invalid_argument(
                "rule",
                format!("Expected search=replace, got '{}'", raw),
                None,
                Some(vec!["--rule acme=zenith".to_string()]),
            )
        })?;
        Self::new(search, replace)
    }
}

impl std::fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.search, self.replace)
    }
}
