//! Ignore-list matching for the rewrite walks.
//!
//! The content walk and the rename walks protect subtrees with two different
//! rules, and both are kept as-is:
//!
//! - content walk: a directory is skipped when its base name equals an entry
//! - rename walks: a directory is skipped when its full path ends with an entry
//!
//! The suffix rule is a raw string tail by default, so `docs` also protects
//! `.../mydocs`. [`SuffixPolicy::Segment`] narrows it to whole path components.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How an ignore entry is compared against the tail of a path during rename walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SuffixPolicy {
    /// Any trailing substring of the path, including a partial last segment.
    #[default]
    Tail,
    /// Whole trailing path segments only.
    Segment,
}

impl SuffixPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixPolicy::Tail => "tail",
            SuffixPolicy::Segment => "segment",
        }
    }
}

/// Ordered list of name fragments excluding subtrees from a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreSet {
    #[serde(default)]
    pub entries: Vec<String>,
    #[serde(default)]
    pub policy: SuffixPolicy,
}

impl IgnoreSet {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            policy: SuffixPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SuffixPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn active(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str).filter(|e| !e.is_empty())
    }

    /// Exact base-name match, used by the content walk.
    pub fn matches_base_name(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.active().any(|entry| entry == name)
    }

    /// Full-path suffix match, used by the file and directory rename walks.
    pub fn matches_path_suffix(&self, path: &Path) -> bool {
        match self.policy {
            SuffixPolicy::Tail => {
                let full = path.to_string_lossy();
                self.active().any(|entry| full.ends_with(entry))
            }
            SuffixPolicy::Segment => self.active().any(|entry| path.ends_with(entry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_match_is_exact() {
        let ignore = IgnoreSet::new(["vendor"]);
        assert!(ignore.matches_base_name(Path::new("src/vendor")));
        assert!(!ignore.matches_base_name(Path::new("src/vendors")));
        assert!(!ignore.matches_base_name(Path::new("src/myvendor")));
    }

    #[test]
    fn tail_policy_matches_partial_last_segment() {
        let ignore = IgnoreSet::new(["docs"]);
        assert!(ignore.matches_path_suffix(Path::new("root/docs")));
        assert!(ignore.matches_path_suffix(Path::new("root/mydocs")));
        assert!(!ignore.matches_path_suffix(Path::new("root/docs/api")));
    }

    #[test]
    fn segment_policy_requires_whole_components() {
        let ignore = IgnoreSet::new(["docs"]).with_policy(SuffixPolicy::Segment);
        assert!(ignore.matches_path_suffix(Path::new("root/docs")));
        assert!(!ignore.matches_path_suffix(Path::new("root/mydocs")));
    }

    #[test]
    fn multi_segment_entries_match_path_tails() {
        let tail = IgnoreSet::new(["third_party/vendor"]);
        let segment = tail.clone().with_policy(SuffixPolicy::Segment);
        let path = Path::new("root/third_party/vendor");
        assert!(tail.matches_path_suffix(path));
        assert!(segment.matches_path_suffix(path));
    }

    #[test]
    fn empty_entries_never_match() {
        let ignore = IgnoreSet::new([""]);
        assert!(!ignore.matches_base_name(Path::new("root/a")));
        assert!(!ignore.matches_path_suffix(Path::new("root/a")));
    }

    #[test]
    fn policy_value_names_match_config_names() {
        assert_eq!(SuffixPolicy::from_str("tail", false).unwrap(), SuffixPolicy::Tail);
        assert_eq!(SuffixPolicy::from_str("segment", false).unwrap(), SuffixPolicy::Segment);
        assert!(SuffixPolicy::from_str("prefix", false).is_err());
        for policy in SuffixPolicy::value_variants() {
            let value = policy.to_possible_value().unwrap();
            assert_eq!(value.get_name(), policy.as_str());
        }
    }
}
