//! Git adapter for the `<git-clean>` precondition.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// True when `git diff --exit-code` reports no unstaged changes to
    /// tracked files.
    #[instrument(skip_all)]
    pub fn diff_is_clean(&self) -> Result<bool> {
        let output = self.run(&["diff", "--exit-code"])?;
        if output.status.success() {
            debug!("worktree is clean");
            return Ok(true);
        }
        warn!(
            exit_code = ?output.status.code(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "worktree not clean"
        );
        Ok(false)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn fresh_commit_is_clean() {
        let repo = TestRepo::new().expect("repo");
        repo.write("README.md", "hello\n").expect("write");
        repo.commit_all("init").expect("commit");

        assert!(Git::new(repo.path()).diff_is_clean().expect("diff"));
    }

    #[test]
    fn modified_tracked_file_is_dirty() {
        let repo = TestRepo::new().expect("repo");
        repo.write("README.md", "hello\n").expect("write");
        repo.commit_all("init").expect("commit");
        repo.write("README.md", "changed\n").expect("modify");

        assert!(!Git::new(repo.path()).diff_is_clean().expect("diff"));
    }

    #[test]
    fn untracked_files_do_not_count() {
        let repo = TestRepo::new().expect("repo");
        repo.write("README.md", "hello\n").expect("write");
        repo.commit_all("init").expect("commit");
        repo.write("scratch.txt", "notes\n").expect("untracked");

        assert!(Git::new(repo.path()).diff_is_clean().expect("diff"));
    }
}
