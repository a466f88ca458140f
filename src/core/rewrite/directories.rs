//! Directory-rename pass.
//!
//! Renaming a directory moves everything beneath it, so the pass never renames
//! while walking. A read-only scan first captures every rename as a
//! [`RenameCandidate`]; the mutation phase then renames deepest first, so each
//! precomputed path is still valid when its turn comes.

use std::collections::HashSet;
use std::fs::Permissions;
use std::path::{Path, PathBuf};

use super::filter::IgnoreSet;
use super::walk;
use crate::error::{Error, Result};

/// A directory scheduled for rename, captured before any mutation.
#[derive(Debug, Clone)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    /// Number of path components; deeper directories rename first.
    pub depth: usize,
    pub permissions: Permissions,
    pub target_path: PathBuf,
}

/// Read-only scan for directories whose base name contains `search`.
///
/// The root itself is never a candidate. Fails with a collision error as soon
/// as a target path already exists on disk or two candidates share a target,
/// before anything is renamed.
pub fn scan_directories(
    root: &Path,
    search: &str,
    replace: &str,
    ignore: &IgnoreSet,
) -> Result<Vec<RenameCandidate>> {
    walk::require_search(search)?;
    let mut candidates = Vec::new();
    let mut targets = HashSet::new();

    let walker = walk::sorted(root)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && ignore.matches_path_suffix(entry.path())));

    for entry in walker {
        let entry = entry.map_err(|e| walk::walk_error(root, e))?;
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            continue;
        }

        let Some(target_path) = walk::substituted_path(entry.path(), search, replace) else {
            continue;
        };

        if walk::exists(&target_path) || !targets.insert(target_path.clone()) {
            return Err(Error::rewrite_collision(
                entry.path().display().to_string(),
                target_path.display().to_string(),
            ));
        }

        let metadata = entry.metadata().map_err(|e| {
            Error::rewrite_read_failed(entry.path().display().to_string(), "stat", e.to_string())
        })?;

        candidates.push(RenameCandidate {
            original_path: entry.path().to_path_buf(),
            depth: entry.path().components().count(),
            permissions: metadata.permissions(),
            target_path,
        });
    }

    Ok(candidates)
}

/// Order candidates deepest first. Stable, so siblings keep walk order.
pub fn order_deepest_first(candidates: &mut [RenameCandidate]) {
    candidates.sort_by(|a, b| b.depth.cmp(&a.depth));
}

/// Rename every directory whose base name contains `search`.
///
/// A failure during the mutation phase aborts immediately: directories already
/// renamed stay renamed, later candidates stay as they were. Returns the number
/// of directories renamed.
pub fn rename_directories(
    root: &Path,
    search: &str,
    replace: &str,
    ignore: &IgnoreSet,
    verbose: bool,
) -> Result<usize> {
    let mut candidates = scan_directories(root, search, replace, ignore)?;
    order_deepest_first(&mut candidates);

    for candidate in &candidates {
        crate::log_verbose!(
            verbose,
            "rewrite",
            "Renaming directory with all contents: {} -> {}",
            candidate.original_path.display(),
            candidate.target_path.display()
        );

        walk::rename_no_clobber(&candidate.original_path, &candidate.target_path)?;
        walk::restore_permissions(&candidate.target_path, candidate.permissions.clone())?;
    }

    Ok(candidates.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn nested_matches_are_scanned_and_ordered_deepest_first() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("acme/inner/acme_deep")).unwrap();
        fs::create_dir_all(root.join("acme_top")).unwrap();

        let mut candidates = scan_directories(root, "acme", "zenith", &IgnoreSet::default()).unwrap();
        order_deepest_first(&mut candidates);

        let originals: Vec<PathBuf> = candidates.iter().map(|c| c.original_path.clone()).collect();
        assert_eq!(originals.len(), 3);
        assert_eq!(originals[0], root.join("acme/inner/acme_deep"));
        assert!(candidates.windows(2).all(|w| w[0].depth >= w[1].depth));
        assert_eq!(candidates[0].target_path, root.join("acme/inner/zenith_deep"));
    }

    #[test]
    fn renames_whole_tree_without_losing_children() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("acme/acme/acme")).unwrap();
        fs::write(root.join("acme/acme/acme/file.txt"), "keep").unwrap();

        let count = rename_directories(root, "acme", "zenith", &IgnoreSet::default(), false).unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(root.join("zenith/zenith/zenith/file.txt")).unwrap(),
            "keep"
        );
        assert!(!root.join("acme").exists());
    }

    #[test]
    fn root_is_never_renamed() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("acme");
        fs::create_dir_all(root.join("acme")).unwrap();

        rename_directories(&root, "acme", "zenith", &IgnoreSet::default(), false).unwrap();

        assert!(root.exists());
        assert!(root.join("zenith").exists());
    }

    #[test]
    fn collision_fails_before_any_rename() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("deep/acme_x")).unwrap();
        fs::create_dir_all(root.join("foo")).unwrap();
        fs::create_dir_all(root.join("bar")).unwrap();

        let err = rename_directories(root, "foo", "bar", &IgnoreSet::default(), false).unwrap_err();
        assert_eq!(err.code.as_str(), "rewrite.collision");
        assert!(root.join("foo").is_dir());
        assert!(root.join("bar").is_dir());

        // A collision anywhere in the scan blocks unrelated candidates too.
        fs::create_dir_all(root.join("zenith_x")).unwrap();
        fs::create_dir_all(root.join("acme_x")).unwrap();
        let err = rename_directories(root, "acme", "zenith", &IgnoreSet::default(), false).unwrap_err();
        assert_eq!(err.code.as_str(), "rewrite.collision");
        assert!(root.join("deep/acme_x").is_dir());
    }

    #[test]
    fn siblings_sharing_a_target_fail_before_any_rename() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ab1")).unwrap();
        fs::create_dir_all(root.join("1ab")).unwrap();

        let err = rename_directories(root, "ab", "", &IgnoreSet::default(), false).unwrap_err();

        assert_eq!(err.code.as_str(), "rewrite.collision");
        assert!(root.join("ab1").is_dir());
        assert!(root.join("1ab").is_dir());
        assert!(!root.join("1").exists());
    }

    #[test]
    fn ignored_path_tail_protects_nested_matches() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/vendor/acme/acme_lib")).unwrap();
        fs::create_dir_all(root.join("src/acme")).unwrap();

        let ignore = IgnoreSet::new(["vendor"]);
        rename_directories(root, "acme", "zenith", &ignore, false).unwrap();

        assert!(root.join("src/vendor/acme/acme_lib").is_dir());
        assert!(root.join("src/zenith").is_dir());
    }

    #[test]
    fn files_are_not_candidates() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("acme.txt"), "x").unwrap();

        let candidates = scan_directories(root, "acme", "zenith", &IgnoreSet::default()).unwrap();
        assert!(candidates.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_follow_renamed_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("acme")).unwrap();
        fs::set_permissions(root.join("acme"), fs::Permissions::from_mode(0o750)).unwrap();

        rename_directories(root, "acme", "zenith", &IgnoreSet::default(), false).unwrap();

        let mode = fs::metadata(root.join("zenith")).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
