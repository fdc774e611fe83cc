//! Repository-local exclude file editing
//!
//! Local-only state is hidden from version control through
//! `.git/info/exclude`, which stays on the developer's machine, instead of
//! `.gitignore`, which would itself show up as a working-tree change.
//! Entries live under a labeled section comment and are matched as exact
//! lines, so repeated installs never duplicate them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, file_read_failed, file_write_failed};

/// Section label for entries owned by this tool
pub const EXCLUDE_SECTION: &str = "Prompt Registry (local)";

fn exclude_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".git").join("info").join("exclude")
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| file_write_failed(parent.display().to_string(), e.to_string()))?;
    }
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content)
        .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
}

/// Add `relative_path` to the repository exclude file under the labeled
/// `section`, creating the file if needed
///
/// Idempotent: an exact-line match means repeated calls never add a second
/// entry. Silently no-ops when `repo_root` has no `.git` directory.
pub fn add_entry(repo_root: &Path, relative_path: &str, section: &str) -> Result<()> {
    if !repo_root.join(".git").is_dir() {
        return Ok(());
    }

    let path = exclude_path(repo_root);
    let mut lines = read_lines(&path)?;

    if lines.iter().any(|line| line == relative_path) {
        return Ok(());
    }

    let header = format!("# {section}");
    match lines.iter().position(|line| *line == header) {
        // Earlier removal may have left the header behind; reuse it
        Some(pos) => lines.insert(pos + 1, relative_path.to_string()),
        None => {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(header);
            lines.push(relative_path.to_string());
        }
    }

    write_lines(&path, &lines)
}

/// Remove `relative_path` from the repository exclude file
///
/// Deletes only the matching path line; the section header may remain.
/// Silently no-ops when the repository or the exclude file is absent.
pub fn remove_entry(repo_root: &Path, relative_path: &str) -> Result<()> {
    if !repo_root.join(".git").is_dir() {
        return Ok(());
    }

    let path = exclude_path(repo_root);
    if !path.exists() {
        return Ok(());
    }

    let lines = read_lines(&path)?;
    let remaining: Vec<String> = lines
        .into_iter()
        .filter(|line| line != relative_path)
        .collect();

    write_lines(&path, &remaining)
}

/// Check whether `relative_path` is present as an exact line
pub fn contains_entry(repo_root: &Path, relative_path: &str) -> bool {
    let path = exclude_path(repo_root);
    fs::read_to_string(&path)
        .map(|content| content.lines().any(|line| line == relative_path))
        .unwrap_or(false)
}
