//! `BundleEntry` struct for the lockfile documents

use serde::{Deserialize, Serialize};

/// An installed bundle recorded in a lockfile document
///
/// Deliberately carries no commit-mode field: which physical document an
/// entry lives in is the sole indicator of its commit mode. Unknown keys in
/// hand-edited or legacy files (including a stale `commitMode`) are ignored
/// on read and disappear on the next rewrite of that bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Installed bundle version
    pub version: String,

    /// Foreign key into the document's `sources` map
    ///
    /// Treated as an opaque string: both the current `{type}-{12hex}` format
    /// and legacy `hub-{hubId}-{sourceId}` keys resolve by exact match.
    pub source_id: String,

    /// Source type at install time (e.g. "github", "local")
    pub source_type: String,

    /// Install timestamp (ISO-8601)
    pub installed_at: String,

    /// Files placed by this bundle, in install order, with content checksums
    pub files: Vec<FileChecksum>,

    /// Hub the bundle was discovered through, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub: Option<String>,

    /// Profile the bundle was installed as part of, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// A recorded file with its content checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksum {
    /// Installed path: repository-relative for repository-scope installs,
    /// absolute for user-scope installs
    pub path: String,

    /// BLAKE3 content checksum at install time
    pub checksum: String,
}

impl FileChecksum {
    /// Create a new file record
    pub fn new(path: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            checksum: checksum.into(),
        }
    }
}
