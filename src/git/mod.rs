//! Git repository operations
//!
//! Prompt Registry scopes all of its state to a repository root: the two
//! lockfile documents live there, and local-only state is hidden through the
//! repository's own exclude file rather than `.gitignore`.

pub mod exclude;

use normpath::PathExt;
use std::path::{Path, PathBuf};

use crate::error::{PromptRegError, Result};

/// Find the git repository root containing `start`, if any
pub fn find_repository_root(start: &Path) -> Option<PathBuf> {
    let repo = git2::Repository::discover(start).ok()?;
    // Normalize for symlink handling (macOS /var -> /private); fall back to
    // the raw path when normalization fails (Windows temp paths)
    repo.workdir().map(|p| {
        p.normalize()
            .map(normpath::BasePathBuf::into_path_buf)
            .unwrap_or_else(|_| p.to_path_buf())
    })
}

/// Find the repository root containing `start`, or fail with a
/// not-in-repository error
pub fn require_repository_root(start: &Path) -> Result<PathBuf> {
    find_repository_root(start).ok_or(PromptRegError::NotInGitRepository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_repository_root() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        git2::Repository::init(temp.path()).unwrap();

        let nested = temp.path().join("deep/nested");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_repository_root(&nested).unwrap();
        let expected = temp
            .path()
            .normalize()
            .map(normpath::BasePathBuf::into_path_buf)
            .unwrap_or_else(|_| temp.path().to_path_buf());
        assert_eq!(root, expected);
    }

    #[test]
    fn test_require_repository_root_outside_repo() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let result = require_repository_root(temp.path());
        assert!(matches!(result, Err(PromptRegError::NotInGitRepository)));
    }
}
