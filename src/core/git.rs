//! Repository acquisition: clone into the run directory and check out the target.

use std::path::{Path, PathBuf};

use crate::config::BuildTarget;
use crate::error::{Error, Result};
use crate::utils::command;

/// Clone `url` into `run_dir`, producing `run_dir/<checkout_dir>`.
pub fn clone_repo(url: &str, run_dir: &Path, checkout_dir: &str, verbose: bool) -> Result<PathBuf> {
    if url.trim().is_empty() {
        return Err(Error::config_invalid_value(
            "repo_url",
            None,
            "repo_url must be set to clone a repository",
        ));
    }

    command::run_step(run_dir, "git", &["clone", url, checkout_dir], verbose)
        .map_err(Error::git_command_failed)?;

    Ok(run_dir.join(checkout_dir))
}

/// Check out the target ref inside an existing clone.
///
/// Tag targets fetch every tag first and check out `tags/<ref>`. Branch targets
/// check out the ref directly; an empty ref keeps the clone's default branch.
pub fn checkout_target(repo_dir: &Path, target: &BuildTarget, verbose: bool) -> Result<()> {
    if target.tag {
        command::run_step(repo_dir, "git", &["fetch", "--all", "--tags"], verbose)
            .map_err(Error::git_command_failed)?;

        let tag_ref = format!("tags/{}", target.git_ref);
        command::run_step(repo_dir, "git", &["checkout", &tag_ref], verbose)
            .map_err(Error::git_command_failed)?;

        crate::log_verbose!(verbose, "git", "Successfully checked out tag {}", target.git_ref);
        return Ok(());
    }

    if target.git_ref.trim().is_empty() {
        return Ok(());
    }

    command::run_step(repo_dir, "git", &["checkout", &target.git_ref], verbose)
        .map_err(Error::git_command_failed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_url_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let err = clone_repo("  ", dir.path(), "project", false).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn clone_of_missing_repository_fails_with_git_code() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("does-not-exist");
        let err = clone_repo(&source.display().to_string(), dir.path(), "project", false).unwrap_err();
        assert_eq!(err.code.as_str(), "git.command_failed");
        assert!(!dir.path().join("project").exists());
    }

    #[test]
    fn empty_branch_ref_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let target = BuildTarget {
            git_ref: String::new(),
            tag: false,
        };
        assert!(checkout_target(dir.path(), &target, false).is_ok());
    }
}
