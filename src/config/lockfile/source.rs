//! `SourceEntry`, `HubEntry` and `ProfileEntry` structs for the lockfile
//! documents

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The origin a bundle was fetched from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Source type (e.g. "github", "local")
    #[serde(rename = "type")]
    pub source_type: String,

    /// Source location
    pub url: String,

    /// Branch pinned at install time, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Subdirectory holding the source's collections, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections_path: Option<String>,

    /// Source-specific configuration carried through verbatim
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SourceEntry {
    /// Create a source entry with just a type and URL
    pub fn new(source_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            url: url.into(),
            branch: None,
            collections_path: None,
            extra: BTreeMap::new(),
        }
    }

    /// Derive the deterministic source id for this entry:
    /// `{type}-{first 12 hex chars of blake3(type, url, config)}`
    ///
    /// Only newly written sources use this format. Legacy ids (such as
    /// `hub-{hubId}-{originalSourceId}`) are never re-derived or parsed; they
    /// stay whatever opaque string the document already holds.
    pub fn id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            self.source_type.as_str(),
            self.url.as_str(),
            self.branch.as_deref().unwrap_or_default(),
            self.collections_path.as_deref().unwrap_or_default(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(b"\0");
        }
        for (key, value) in &self.extra {
            hasher.update(key.as_bytes());
            hasher.update(b"\0");
            hasher.update(value.to_string().as_bytes());
            hasher.update(b"\0");
        }
        let hex = hasher.finalize().to_hex();
        format!("{}-{}", self.source_type, &hex[..12])
    }
}

/// A hub a bundle was discovered through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntry {
    /// Display name
    pub name: String,

    /// Hub location
    pub url: String,
}

/// A named group of bundles installed together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    /// Display name
    pub name: String,

    /// Member bundle ids, in install order
    pub bundle_ids: Vec<String>,
}
