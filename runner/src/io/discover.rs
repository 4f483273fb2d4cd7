//! Workspace package discovery.
//!
//! A package is a directory holding at least one source file two or three
//! levels below the workspace root.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::error::RunnerError;

/// Extension of files that make their directory a package.
pub const SOURCE_EXTENSION: &str = "go";

/// Packages matching this are never offered: test helpers, `.local` scratch
/// trees, the command template and the bare `cmd` directory.
const IGNORE_PATTERN: &str = r"test$|(^|/)\.local(/|$)|^cmd/template$|^cmd$";

/// Source of the package names a package-scoped task may target.
pub trait PackageSource {
    fn packages(&self) -> Result<Vec<String>>;
}

/// Packages found by walking a workspace directory.
#[derive(Debug, Clone)]
pub struct WorkspacePackages {
    root: PathBuf,
}

impl WorkspacePackages {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PackageSource for WorkspacePackages {
    fn packages(&self) -> Result<Vec<String>> {
        discover(&self.root)
    }
}

/// Walk `root` and return the sorted, de-duplicated package list.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover(root: &Path) -> Result<Vec<String>> {
    let ignore = Regex::new(IGNORE_PATTERN).context("compile package ignore pattern")?;
    let mut packages = Vec::new();
    for entry in WalkDir::new(root).min_depth(2).max_depth(3) {
        let entry = entry.map_err(|source| RunnerError::Discovery {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        let Ok(relative) = parent.strip_prefix(root) else {
            continue;
        };
        let name = package_name(relative);
        if name.is_empty() || ignore.is_match(&name) {
            continue;
        }
        packages.push(name);
    }
    packages.sort();
    packages.dedup();
    debug!(count = packages.len(), "packages discovered");
    Ok(packages)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// Relative directory as a `/`-separated name without a leading `./`.
fn package_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, "package x\n").expect("write");
    }

    #[test]
    fn finds_packages_at_depth_two_and_three() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(root, "main.go");
        touch(root, "log/log.go");
        touch(root, "log/level.go");
        touch(root, "cmd/run/main.go");
        touch(root, "pkg/http/client.go");
        touch(root, "pkg/http/client/too_deep.go");
        touch(root, "docs/readme.md");

        let packages = discover(root).expect("discover");
        assert_eq!(packages, vec!["cmd/run", "log", "pkg/http"]);
    }

    #[test]
    fn ignored_paths_are_filtered() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(root, "cmd/main.go");
        touch(root, "cmd/template/main.go");
        touch(root, "cmd/changelog/main.go");
        touch(root, "internal/logtest/fake.go");
        touch(root, ".local/scratch/x.go");
        touch(root, "tools/.local/x.go");

        let packages = discover(root).expect("discover");
        assert_eq!(packages, vec!["cmd/changelog"]);
    }

    #[test]
    fn missing_root_is_discovery_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = discover(&temp.path().join("absent")).unwrap_err();
        assert!(matches!(
            crate::error::classify(&err),
            Some(RunnerError::Discovery { .. })
        ));
        assert!(err.to_string().contains("discover packages under"));
    }

    #[test]
    fn workspace_source_delegates_to_discover() {
        let temp = tempfile::tempdir().expect("tempdir");
        touch(temp.path(), "ids/ids.go");
        let source = WorkspacePackages::new(temp.path());
        assert_eq!(source.packages().expect("packages"), vec!["ids"]);
    }
}
