//! Staged bundle content discovery and classification
//!
//! A staged bundle is a plain directory of extracted content. Only files the
//! registry understands are installed; everything else is skipped.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, file_not_found};

/// What a payload file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// `*.prompt.md` reusable prompt
    Prompt,
    /// `*.instructions.md` custom instructions
    Instructions,
    /// `mcp.json` MCP server definitions
    McpConfig,
}

/// One classified file from a staged bundle
#[derive(Debug, Clone)]
pub struct PayloadFile {
    pub path: PathBuf,
    pub kind: PayloadKind,
}

/// Classify a file by the naming conventions bundles use
pub fn classify(path: &Path) -> Option<PayloadKind> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(".prompt.md") {
        Some(PayloadKind::Prompt)
    } else if name.ends_with(".instructions.md") {
        Some(PayloadKind::Instructions)
    } else if name == "mcp.json" {
        Some(PayloadKind::McpConfig)
    } else {
        None
    }
}

/// Walk a staged bundle directory and collect its installable files, sorted
/// by path for deterministic install order
pub fn discover_payload(staged_dir: &Path) -> Result<Vec<PayloadFile>> {
    if !staged_dir.is_dir() {
        return Err(file_not_found(staged_dir.display().to_string()));
    }

    let mut files: Vec<PayloadFile> = WalkDir::new(staged_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|entry| match classify(entry.path()) {
            Some(kind) => Some(PayloadFile {
                path: entry.into_path(),
                kind,
            }),
            None => {
                debug!(path = %entry.path().display(), "skipping unrecognized payload file");
                None
            }
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
