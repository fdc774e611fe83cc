//! Bundle installation orchestration
//!
//! Places staged bundle content into its destination, computes checksums of
//! the installed files, and records the result through the lockfile store.
//! The store is the sole source of truth for what is installed and where;
//! the installer never keeps state of its own.
//!
//! Fetching and extracting bundle archives happens upstream; the installer
//! consumes an already-staged directory. Staging and cache artifacts are
//! never placed inside the repository working tree.

pub mod payload;


use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::lockfile::{FileChecksum, SourceEntry};
use crate::error::{
    Result, bundle_not_found, config_invalid, file_read_failed, file_write_failed,
    invalid_bundle_id,
};
use crate::hash;
use crate::mcp::McpServerManager;
use crate::store::{CommitMode, HubRef, InstallRecord, LockfileStore, ProfileRef};

use payload::{PayloadKind, discover_payload};

/// Where a bundle's files land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallScope {
    /// Tool-owned storage under the user's data directory
    User,
    /// Version-controllable `.github/` directories at the repository root
    Repository,
}

impl InstallScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Repository => "repository",
        }
    }
}

/// Everything needed to install one staged bundle
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub bundle_id: String,
    pub version: String,
    /// Directory holding the extracted bundle content
    pub staged_dir: PathBuf,
    pub scope: InstallScope,
    pub commit_mode: CommitMode,
    pub source: SourceEntry,
    pub hub: Option<HubRef>,
    pub profile: Option<ProfileRef>,
}

/// What an install placed and recorded
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub files: Vec<FileChecksum>,
    pub mcp_servers: Vec<String>,
}

/// Storage root for user-scope installs
///
/// `PROMPTREG_DATA_DIR` overrides the platform data directory (tests rely
/// on this). Never inside a repository working tree.
pub fn data_root() -> PathBuf {
    if let Ok(dir) = std::env::var("PROMPTREG_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("promptreg")
}

/// Install a staged bundle and record it in the lockfile store
pub fn install(
    store: &LockfileStore,
    mcp: &McpServerManager,
    request: &InstallRequest,
) -> Result<InstallOutcome> {
    validate_bundle_id(&request.bundle_id)?;
    let payload = discover_payload(&request.staged_dir)?;

    let mut files = Vec::new();
    let mut servers: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    for item in &payload {
        match item.kind {
            PayloadKind::McpConfig => collect_servers(&item.path, &mut servers)?,
            kind => files.push(place_file(store.root(), request, &item.path, kind)?),
        }
    }

    let mut mcp_servers = Vec::new();
    if !servers.is_empty() {
        match request.scope {
            InstallScope::Repository => {
                mcp.merge_servers(&request.bundle_id, &servers, request.commit_mode)?;
                mcp_servers = servers.keys().cloned().collect();
            }
            InstallScope::User => {
                warn!(
                    bundle = %request.bundle_id,
                    "user-scope installs do not merge MCP server definitions; skipping"
                );
            }
        }
    }

    store.create_or_update(&InstallRecord {
        bundle_id: request.bundle_id.clone(),
        version: request.version.clone(),
        source_id: request.source.id(),
        source_type: request.source.source_type.clone(),
        commit_mode: request.commit_mode,
        files: files.clone(),
        source: request.source.clone(),
        hub: request.hub.clone(),
        profile: request.profile.clone(),
    })?;

    Ok(InstallOutcome { files, mcp_servers })
}

/// Remove a bundle's installed files, MCP servers and lockfile record
///
/// Returns the recorded paths that were actually deleted. Files already
/// missing from disk are tolerated.
pub fn uninstall(
    store: &LockfileStore,
    mcp: &McpServerManager,
    bundle_id: &str,
) -> Result<Vec<String>> {
    let Some(bundle) = store
        .installed_bundles()
        .into_iter()
        .find(|b| b.id == bundle_id)
    else {
        return Err(bundle_not_found(bundle_id));
    };

    let mut removed = Vec::new();
    for file in &bundle.entry.files {
        let path = resolve_recorded_path(store.root(), &file.path);
        match fs::remove_file(&path) {
            Ok(()) => removed.push(file.path.clone()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), "failed to delete installed file: {e}"),
        }
    }

    // User-scope installs keep everything under one bundle directory
    let user_dir = data_root().join("bundles").join(bundle_id);
    if user_dir.is_dir() {
        if let Err(e) = fs::remove_dir_all(&user_dir) {
            warn!(path = %user_dir.display(), "failed to clean user bundle directory: {e}");
        }
    }

    mcp.remove_bundle_servers(bundle_id)?;
    store.remove(bundle_id)?;
    Ok(removed)
}

fn validate_bundle_id(id: &str) -> Result<()> {
    let valid = !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != "..";
    if valid { Ok(()) } else { Err(invalid_bundle_id(id)) }
}

fn destination_dir(
    repo_root: &Path,
    scope: InstallScope,
    bundle_id: &str,
    kind: PayloadKind,
) -> PathBuf {
    let subdir = match kind {
        PayloadKind::Prompt => "prompts",
        PayloadKind::Instructions => "instructions",
        PayloadKind::McpConfig => "mcp",
    };
    match scope {
        InstallScope::Repository => repo_root.join(".github").join(subdir),
        InstallScope::User => data_root().join("bundles").join(bundle_id).join(subdir),
    }
}

fn place_file(
    repo_root: &Path,
    request: &InstallRequest,
    staged_path: &Path,
    kind: PayloadKind,
) -> Result<FileChecksum> {
    let dir = destination_dir(repo_root, request.scope, &request.bundle_id, kind);
    fs::create_dir_all(&dir)
        .map_err(|e| file_write_failed(dir.display().to_string(), e.to_string()))?;

    let name = staged_path
        .file_name()
        .ok_or_else(|| file_read_failed(staged_path.display().to_string(), "missing file name"))?;
    let dest = dir.join(name);
    fs::copy(staged_path, &dest)
        .map_err(|e| file_write_failed(dest.display().to_string(), e.to_string()))?;

    // Checksum the installed copy, not the staged one
    let checksum = hash::checksum_file(&dest)?;
    let recorded = match request.scope {
        InstallScope::Repository => dest
            .strip_prefix(repo_root)
            .unwrap_or(&dest)
            .to_string_lossy()
            .replace('\\', "/"),
        InstallScope::User => dest.to_string_lossy().to_string(),
    };
    Ok(FileChecksum::new(recorded, checksum))
}

/// Read MCP server definitions from a payload `mcp.json`
///
/// Accepts both the workspace form (`{"servers": {...}}`) and a bare map of
/// server definitions.
fn collect_servers(
    path: &Path,
    servers: &mut BTreeMap<String, serde_json::Value>,
) -> Result<()> {
    let raw = fs::read_to_string(path)
        .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
        config_invalid(format!(
            "invalid mcp.json in bundle payload ({}): {e}",
            path.display()
        ))
    })?;

    let map = match value.get("servers") {
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => {
            return Err(config_invalid(format!(
                "mcp.json 'servers' must be an object ({})",
                path.display()
            )));
        }
        None => match value {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(config_invalid(format!(
                    "mcp.json must be an object ({})",
                    path.display()
                )));
            }
        },
    };
    for (name, definition) in map {
        servers.insert(name, definition);
    }
    Ok(())
}

fn resolve_recorded_path(repo_root: &Path, recorded: &str) -> PathBuf {
    let path = Path::new(recorded);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}
