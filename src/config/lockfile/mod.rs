//! Lockfile document main module
//!
//! A lockfile records which bundles are installed, the files they placed
//! (with BLAKE3 checksums), and the sources/hubs/profiles they came from.
//! Two physical documents share this schema: the main lockfile (intended to
//! be committed) and the local lockfile (kept out of version control via the
//! repository git-exclude file).

pub mod bundle;
pub mod source;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, lockfile_parse_failed};

// Re-export types for use in parent config module
pub use bundle::{BundleEntry, FileChecksum};
pub use source::{HubEntry, ProfileEntry, SourceEntry};

/// Main lockfile filename (commit-mode bundles, version-controlled)
pub const LOCKFILE_NAME: &str = "prompt-registry.lock.json";

/// Local lockfile filename (local-only bundles, git-excluded)
pub const LOCAL_LOCKFILE_NAME: &str = "prompt-registry.local.lock.json";

/// Schema reference recorded in every document
pub const SCHEMA_REF: &str = "https://promptreg.dev/schemas/lockfile/v1.json";

/// Current document schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Current UTC timestamp in the ISO-8601 form used throughout the documents
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn generated_by() -> String {
    format!("promptreg@{}", env!("CARGO_PKG_VERSION"))
}

/// A lockfile document (`prompt-registry.lock.json` or
/// `prompt-registry.local.lock.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    /// Schema this document validates against
    pub schema_ref: String,

    /// Document schema version (not a bundle version)
    pub version: String,

    /// Timestamp of the last write
    pub generated_at: String,

    /// Producing tool identifier and version
    pub generated_by: String,

    /// Installed bundles, keyed by bundle id
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleEntry>,

    /// Bundle origins, keyed by source id
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,

    /// Hub provenance records; omitted from the serialized form when empty
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hubs: BTreeMap<String, HubEntry>,

    /// Profile records; omitted from the serialized form when empty
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, ProfileEntry>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockfile {
    /// Create a new, empty document with the current header fields
    pub fn new() -> Self {
        Self {
            schema_ref: SCHEMA_REF.to_string(),
            version: SCHEMA_VERSION.to_string(),
            generated_at: now_timestamp(),
            generated_by: generated_by(),
            bundles: BTreeMap::new(),
            sources: BTreeMap::new(),
            hubs: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }

    /// Parse a document from a JSON string
    ///
    /// `path` is only used for error messages.
    pub fn from_json(json: &str, path: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| lockfile_parse_failed(path, e.to_string()))
    }

    /// Serialize to the persisted form: 2-space indented JSON with a trailing
    /// newline, so the committed file stays hand-readable and diffable
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| lockfile_parse_failed(LOCKFILE_NAME, e.to_string()))?;
        Ok(format!("{json}\n"))
    }

    /// Refresh the write-tracking header fields before persisting
    pub fn touch(&mut self) {
        self.generated_at = now_timestamp();
        self.generated_by = generated_by();
    }

    /// True when the document holds no bundles and must not be persisted
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Check if a bundle is recorded in this document
    pub fn contains(&self, bundle_id: &str) -> bool {
        self.bundles.contains_key(bundle_id)
    }

    /// Find a bundle entry by id
    pub fn find_bundle(&self, bundle_id: &str) -> Option<&BundleEntry> {
        self.bundles.get(bundle_id)
    }

    /// Insert or replace a bundle entry
    pub fn insert_bundle(&mut self, bundle_id: impl Into<String>, entry: BundleEntry) {
        self.bundles.insert(bundle_id.into(), entry);
    }

    /// Remove a bundle entry, returning it if present
    pub fn remove_bundle(&mut self, bundle_id: &str) -> Option<BundleEntry> {
        self.bundles.remove(bundle_id)
    }

    /// Remove source entries no longer referenced by any remaining bundle
    ///
    /// Returns the pruned source ids. Source ids are matched as opaque
    /// strings, so legacy `hub-{hubId}-...` keys survive unchanged as long
    /// as a bundle still points at them.
    pub fn prune_orphan_sources(&mut self) -> Vec<String> {
        let referenced: std::collections::BTreeSet<&str> =
            self.bundles.values().map(|b| b.source_id.as_str()).collect();

        let orphaned: Vec<String> = self
            .sources
            .keys()
            .filter(|id| !referenced.contains(id.as_str()))
            .cloned()
            .collect();

        for id in &orphaned {
            self.sources.remove(id);
        }
        orphaned
    }

    /// Drop hub records and profile membership no remaining bundle refers to
    pub fn prune_orphan_refs(&mut self) {
        let hub_refs: std::collections::BTreeSet<&str> = self
            .bundles
            .values()
            .filter_map(|b| b.hub.as_deref())
            .collect();
        self.hubs.retain(|id, _| hub_refs.contains(id.as_str()));

        let bundle_ids: std::collections::BTreeSet<&str> =
            self.bundles.keys().map(String::as_str).collect();
        for profile in self.profiles.values_mut() {
            profile
                .bundle_ids
                .retain(|id| bundle_ids.contains(id.as_str()));
        }
        self.profiles.retain(|_, p| !p.bundle_ids.is_empty());
    }
}
