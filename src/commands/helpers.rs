//! Shared helpers for command implementations

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{PromptRegError, Result};
use crate::git;
use crate::store::LockfileStore;

/// Resolve the starting directory from the CLI argument or cwd
pub fn workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| PromptRegError::IoError {
            message: format!("Failed to get current directory: {}", e),
        }),
    }
}

/// Open the lockfile store for the repository containing the workspace path
pub fn open_store(workspace: Option<PathBuf>) -> Result<Arc<LockfileStore>> {
    let start = workspace_path(workspace)?;
    let root = git::require_repository_root(&start)?;
    LockfileStore::open(&root)
}
