//! MCP server configuration management
//!
//! Bundles may ship MCP server definitions. Those are merged into the
//! workspace configuration (`.vscode/mcp.json`) while a sidecar tracking
//! file records which server belongs to which bundle, mirroring the lockfile
//! store's discipline: atomic writes, serialized mutation, git-exclude
//! handling for local-only installs, and strict ownership on removal —
//! servers not owned by the removed bundle are preserved untouched.


use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::common::fs as common_fs;
use crate::error::{Result, file_read_failed, file_write_failed, lockfile_parse_failed};
use crate::git::exclude::{self, EXCLUDE_SECTION};
use crate::store::CommitMode;

/// Workspace MCP configuration file, relative to the repository root
pub const MCP_CONFIG_FILE: &str = ".vscode/mcp.json";

/// Sidecar tracking file mapping servers to owning bundles
pub const MCP_TRACKING_FILE: &str = ".vscode/mcp-servers.lock.json";

const TRACKING_VERSION: &str = "1.0.0";

/// The workspace MCP configuration document
///
/// Only the `servers` map is interpreted; every other key (e.g. `inputs`)
/// is carried through verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub servers: BTreeMap<String, serde_json::Value>,

    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The sidecar ownership document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTracking {
    pub version: String,

    /// Server name -> owning bundle id
    #[serde(default)]
    pub servers: BTreeMap<String, String>,
}

impl Default for McpTracking {
    fn default() -> Self {
        Self {
            version: TRACKING_VERSION.to_string(),
            servers: BTreeMap::new(),
        }
    }
}

/// Manages MCP server entries for one repository root
pub struct McpServerManager {
    root: PathBuf,
    mutate: Mutex<()>,
}

impl McpServerManager {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            mutate: Mutex::new(()),
        }
    }

    /// Absolute path of the workspace MCP configuration
    pub fn config_path(&self) -> PathBuf {
        self.root.join(MCP_CONFIG_FILE)
    }

    /// Absolute path of the ownership tracking file
    pub fn tracking_path(&self) -> PathBuf {
        self.root.join(MCP_TRACKING_FILE)
    }

    /// Merge a bundle's server definitions into the workspace configuration
    ///
    /// Later installs win per server name; ownership is recorded in the
    /// tracking file. For local-only installs the tracking file is added to
    /// the repository exclude file.
    pub fn merge_servers(
        &self,
        bundle_id: &str,
        servers: &BTreeMap<String, serde_json::Value>,
        commit_mode: CommitMode,
    ) -> Result<()> {
        if servers.is_empty() {
            return Ok(());
        }
        let _guard = self.lock();

        let mut config = self.load_config()?;
        let mut tracking = self.load_tracking();
        for (name, definition) in servers {
            config.servers.insert(name.clone(), definition.clone());
            tracking.servers.insert(name.clone(), bundle_id.to_string());
        }

        self.persist(&self.config_path(), &config)?;
        self.persist(&self.tracking_path(), &tracking)?;

        if commit_mode == CommitMode::LocalOnly {
            exclude::add_entry(&self.root, MCP_TRACKING_FILE, EXCLUDE_SECTION)?;
        }
        Ok(())
    }

    /// Remove every server owned by a bundle, preserving all other entries
    ///
    /// Returns the removed server names. No-ops when the bundle owns
    /// nothing. An emptied tracking file is deleted outright.
    pub fn remove_bundle_servers(&self, bundle_id: &str) -> Result<Vec<String>> {
        let _guard = self.lock();

        let mut tracking = self.load_tracking();
        let owned: Vec<String> = tracking
            .servers
            .iter()
            .filter(|(_, owner)| owner.as_str() == bundle_id)
            .map(|(name, _)| name.clone())
            .collect();
        if owned.is_empty() {
            return Ok(owned);
        }

        let mut config = self.load_config()?;
        for name in &owned {
            config.servers.remove(name);
            tracking.servers.remove(name);
        }
        self.persist(&self.config_path(), &config)?;

        if tracking.servers.is_empty() {
            if let Err(e) = fs::remove_file(self.tracking_path()) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.tracking_path().display(), "failed to delete tracking file: {e}");
                }
            }
            if let Err(e) = exclude::remove_entry(&self.root, MCP_TRACKING_FILE) {
                warn!(root = %self.root.display(), "failed to update git exclude: {e}");
            }
        } else {
            self.persist(&self.tracking_path(), &tracking)?;
        }
        Ok(owned)
    }

    /// Server names currently owned by a bundle
    pub fn owned_servers(&self, bundle_id: &str) -> Vec<String> {
        self.load_tracking()
            .servers
            .into_iter()
            .filter(|(_, owner)| owner == bundle_id)
            .map(|(name, _)| name)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The configuration is shared with the user and other tools: an
    /// unparsable file is an error, never silently clobbered.
    fn load_config(&self) -> Result<McpConfig> {
        let path = self.config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(McpConfig::default());
            }
            Err(e) => {
                return Err(file_read_failed(path.display().to_string(), e.to_string()));
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| lockfile_parse_failed(path.display().to_string(), e.to_string()))
    }

    /// The tracking file is wholly ours: corruption reads as empty.
    fn load_tracking(&self) -> McpTracking {
        let path = self.tracking_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return McpTracking::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(tracking) => tracking,
            Err(e) => {
                warn!(path = %path.display(), "treating corrupted tracking file as empty: {e}");
                McpTracking::default()
            }
        }
    }

    fn persist<T: Serialize>(&self, path: &Path, document: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| lockfile_parse_failed(path.display().to_string(), e.to_string()))?;
        common_fs::write_atomic(path, &format!("{json}\n"))
            .map_err(|e| file_write_failed(path.display().to_string(), e.to_string()))
    }
}
