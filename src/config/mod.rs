//! Configuration document handling for Prompt Registry
//!
//! This module contains data structures for:
//! - `prompt-registry.lock.json` / `prompt-registry.local.lock.json` - the
//!   two lockfile documents (same schema, different commit policy)
//! - the versioned lockfile schema validator

pub mod lockfile;
pub mod schema;

// Re-export commonly used types
pub use lockfile::{BundleEntry, FileChecksum, HubEntry, Lockfile, ProfileEntry, SourceEntry};
pub use schema::ValidationReport;
