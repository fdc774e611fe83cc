//! The lockfile store
//!
//! System of record for which bundles are installed in a repository. Two
//! physical documents share one schema: the main lockfile
//! (`prompt-registry.lock.json`, intended to be committed) and the local
//! lockfile (`prompt-registry.local.lock.json`, kept out of version control
//! via the repository exclude file). Which document a bundle lives in is the
//! sole indicator of its commit mode.
//!
//! All mutations are read-modify-write of the freshest on-disk state under a
//! store-wide lock, persisted atomically (temp sibling + rename), so
//! concurrent operations serialize instead of losing updates and no reader
//! ever observes a half-written document.

pub mod events;
pub mod registry;
mod watcher;


use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use normpath::PathExt;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::common::fs as common_fs;

use crate::config::lockfile::{
    BundleEntry, FileChecksum, HubEntry, LOCAL_LOCKFILE_NAME, LOCKFILE_NAME, Lockfile,
    ProfileEntry, SourceEntry, now_timestamp,
};
use crate::config::schema::{self, ValidationReport};
use crate::error::{Result, bundle_not_found_in_lockfile, lockfile_write_failed, repository_not_found};
use crate::git::exclude::{self, EXCLUDE_SECTION};
use crate::hash;

pub use events::{LockfileEvent, SubscriptionId};
pub use registry::StoreRegistry;

/// Which lockfile document a bundle's record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    /// Record lives in the main lockfile and is meant to be committed
    Commit,
    /// Record lives in the local lockfile, hidden via git-exclude
    LocalOnly,
}

impl CommitMode {
    /// The other document's mode
    pub fn opposite(self) -> Self {
        match self {
            Self::Commit => Self::LocalOnly,
            Self::LocalOnly => Self::Commit,
        }
    }

    /// Wire form: `commit` / `local-only`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::LocalOnly => "local-only",
        }
    }

    /// Human-readable document name for error messages
    fn lockfile_label(self) -> &'static str {
        match self {
            Self::Commit => "commit lockfile",
            Self::LocalOnly => "local lockfile",
        }
    }
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hub provenance supplied with an install
#[derive(Debug, Clone)]
pub struct HubRef {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Profile membership supplied with an install
#[derive(Debug, Clone)]
pub struct ProfileRef {
    pub id: String,
    pub name: String,
}

/// Everything the store needs to record one installed bundle
#[derive(Debug, Clone)]
pub struct InstallRecord {
    pub bundle_id: String,
    pub version: String,
    pub source_id: String,
    pub source_type: String,
    pub commit_mode: CommitMode,
    pub files: Vec<FileChecksum>,
    pub source: SourceEntry,
    pub hub: Option<HubRef>,
    pub profile: Option<ProfileRef>,
}

/// A bundle from the unified listing over both documents
///
/// `commit_mode` is derived from the document the entry was read from, never
/// from anything stored inside the entry itself.
#[derive(Debug, Clone)]
pub struct InstalledBundle {
    pub id: String,
    pub commit_mode: CommitMode,
    pub entry: BundleEntry,
    pub source: Option<SourceEntry>,
}

/// A recorded file whose on-disk state no longer matches the lockfile
#[derive(Debug, Clone)]
pub struct ModifiedFile {
    /// Path as recorded in the lockfile
    pub path: String,
    pub kind: ModificationKind,
}

/// How a recorded file drifted from its installed state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationKind {
    /// File no longer exists (or cannot be read)
    Missing,
    /// File exists with different contents
    Modified { recorded: String, current: String },
}

/// Routing handle for one of the two physical documents
///
/// Every read and write path resolves its target through
/// [`LockfileStore::document`], so insert, remove and list logic can never
/// disagree about which file a commit mode maps to.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub mode: CommitMode,
    pub path: PathBuf,
}

impl DocumentHandle {
    fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// The dual-lockfile store, scoped to one repository root
pub struct LockfileStore {
    root: PathBuf,
    /// Serializes every document mutation; guard held across the
    /// read-modify-write so queued operations apply over fresh state
    mutate: Mutex<()>,
    events: events::EventBus,
    watcher: Mutex<Option<watcher::LockfileWatcher>>,
}

impl LockfileStore {
    /// Open a store rooted at `root` and start watching both lockfile paths
    ///
    /// External modifications (e.g. a `git pull` updating the committed
    /// lockfile) re-fire the change event until [`Self::dispose`] is called.
    pub fn open(root: &Path) -> Result<Arc<Self>> {
        if !root.is_dir() {
            return Err(repository_not_found(root.display().to_string()));
        }
        let root = root
            .normalize()
            .map(normpath::BasePathBuf::into_path_buf)
            .unwrap_or_else(|_| root.to_path_buf());

        let store = Arc::new(Self {
            root,
            mutate: Mutex::new(()),
            events: events::EventBus::new(),
            watcher: Mutex::new(None),
        });
        store.start_watcher();
        Ok(store)
    }

    /// Repository root this store is scoped to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the main (commit-mode) lockfile
    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_NAME)
    }

    /// Absolute path of the local (local-only) lockfile
    pub fn local_lockfile_path(&self) -> PathBuf {
        self.root.join(LOCAL_LOCKFILE_NAME)
    }

    /// Resolve the document a commit mode maps to
    pub fn document(&self, mode: CommitMode) -> DocumentHandle {
        let path = match mode {
            CommitMode::Commit => self.lockfile_path(),
            CommitMode::LocalOnly => self.local_lockfile_path(),
        };
        DocumentHandle { mode, path }
    }

    /// Write or update a bundle record in the document selected by the
    /// record's commit mode
    ///
    /// Creates the document (with header fields) when absent. A reinstall
    /// that changes commit mode migrates the record: the bundle never
    /// survives in the other document. Write failures propagate.
    pub fn create_or_update(&self, record: &InstallRecord) -> Result<()> {
        let _guard = self.lock_documents();

        let target = self.document(record.commit_mode);
        let mut doc = self.load_document(&target).unwrap_or_default();
        upsert_record(&mut doc, record);
        self.persist_document(&target, &mut doc)?;

        if record.commit_mode == CommitMode::LocalOnly {
            exclude::add_entry(&self.root, LOCAL_LOCKFILE_NAME, EXCLUDE_SECTION)?;
        }

        let other = self.document(record.commit_mode.opposite());
        let migration_event = self.remove_from_document(&other, &record.bundle_id)?;

        self.events.emit(&LockfileEvent {
            mode: record.commit_mode,
            document: Some(doc),
        });
        if let Some(event) = migration_event {
            self.events.emit(&event);
        }
        Ok(())
    }

    /// Delete a bundle record from whichever document contains it
    ///
    /// No-ops when the bundle is unknown. Sources no longer referenced by a
    /// remaining bundle are pruned; a document left without bundles is
    /// deleted outright (and, for the local document, un-excluded).
    pub fn remove(&self, bundle_id: &str) -> Result<()> {
        let _guard = self.lock_documents();

        let mut pending = Vec::new();
        for mode in [CommitMode::Commit, CommitMode::LocalOnly] {
            let handle = self.document(mode);
            if let Some(event) = self.remove_from_document(&handle, bundle_id)? {
                pending.push(event);
            }
        }
        for event in pending {
            self.events.emit(&event);
        }
        Ok(())
    }

    /// Move a bundle between the two documents
    ///
    /// Fails when the bundle is not recorded in the document implied by the
    /// opposite of `new_mode`. The entry is copied unchanged (only the
    /// documents' own `generatedAt` headers are refreshed) together with its
    /// source and any hub/profile records it points at. Copy-then-delete: if
    /// the source-side rewrite fails, the target write is rolled back and
    /// the error propagates, so the move stays all-or-nothing.
    pub fn update_commit_mode(&self, bundle_id: &str, new_mode: CommitMode) -> Result<()> {
        let _guard = self.lock_documents();

        let source_handle = self.document(new_mode.opposite());
        let target_handle = self.document(new_mode);

        let Some(mut source_doc) = self.load_document(&source_handle) else {
            return Err(bundle_not_found_in_lockfile(
                bundle_id,
                source_handle.mode.lockfile_label(),
            ));
        };
        let Some(entry) = source_doc.remove_bundle(bundle_id) else {
            return Err(bundle_not_found_in_lockfile(
                bundle_id,
                source_handle.mode.lockfile_label(),
            ));
        };

        let previous_target = self.load_document(&target_handle);
        let mut target_doc = previous_target.clone().unwrap_or_default();
        copy_references(&source_doc, &mut target_doc, bundle_id, &entry);
        target_doc.insert_bundle(bundle_id, entry);
        self.persist_document(&target_handle, &mut target_doc)?;

        source_doc.prune_orphan_sources();
        source_doc.prune_orphan_refs();
        let source_event = if source_doc.is_empty() {
            self.delete_document(&source_handle);
            LockfileEvent {
                mode: source_handle.mode,
                document: None,
            }
        } else {
            match self.persist_document(&source_handle, &mut source_doc) {
                Ok(()) => LockfileEvent {
                    mode: source_handle.mode,
                    document: Some(source_doc),
                },
                Err(err) => {
                    self.rollback_target(&target_handle, previous_target);
                    return Err(err);
                }
            }
        };

        if new_mode == CommitMode::LocalOnly {
            exclude::add_entry(&self.root, LOCAL_LOCKFILE_NAME, EXCLUDE_SECTION)?;
        }

        self.events.emit(&LockfileEvent {
            mode: new_mode,
            document: Some(target_doc),
        });
        self.events.emit(&source_event);
        Ok(())
    }

    /// Parsed contents of the main lockfile
    ///
    /// Absent and unparsable files both read as `None`; corruption is logged
    /// as a warning, never thrown.
    pub fn read(&self) -> Option<Lockfile> {
        self.load_document(&self.document(CommitMode::Commit))
    }

    /// Validate the main lockfile against the versioned schema
    ///
    /// Reports `valid: false` when no lockfile exists.
    pub fn validate(&self) -> ValidationReport {
        let path = self.lockfile_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return ValidationReport::missing(),
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => schema::validate_value(&value),
            Err(e) => ValidationReport::unparsable(&e.to_string()),
        }
    }

    /// Unified listing over both documents
    ///
    /// Every record's commit mode is forced from the document it was read
    /// from. When the same bundle id appears in both documents the main
    /// lockfile wins; each such conflict is reported once per detection and
    /// the listing continues.
    pub fn installed_bundles(&self) -> Vec<InstalledBundle> {
        let main = self.load_document(&self.document(CommitMode::Commit));
        let local = self.load_document(&self.document(CommitMode::LocalOnly));

        let mut result = Vec::new();
        if let Some(doc) = &main {
            for (id, entry) in &doc.bundles {
                result.push(InstalledBundle {
                    id: id.clone(),
                    commit_mode: CommitMode::Commit,
                    entry: entry.clone(),
                    source: doc.sources.get(&entry.source_id).cloned(),
                });
            }
        }
        if let Some(doc) = &local {
            for (id, entry) in &doc.bundles {
                if main.as_ref().is_some_and(|m| m.contains(id)) {
                    error!(
                        bundle = %id,
                        main = %self.lockfile_path().display(),
                        local = %self.local_lockfile_path().display(),
                        "bundle recorded in both lockfiles; keeping the commit lockfile entry"
                    );
                    continue;
                }
                result.push(InstalledBundle {
                    id: id.clone(),
                    commit_mode: CommitMode::LocalOnly,
                    entry: entry.clone(),
                    source: doc.sources.get(&entry.source_id).cloned(),
                });
            }
        }
        result
    }

    /// Compare a bundle's recorded file checksums against the disk
    ///
    /// Unchanged files are omitted. An unknown bundle id yields an empty
    /// list, not an error.
    pub fn detect_modified_files(&self, bundle_id: &str) -> Result<Vec<ModifiedFile>> {
        let Some(bundle) = self
            .installed_bundles()
            .into_iter()
            .find(|b| b.id == bundle_id)
        else {
            return Ok(Vec::new());
        };

        let mut drifted = Vec::new();
        for file in &bundle.entry.files {
            let path = self.resolve_recorded_path(&file.path);
            if !path.exists() {
                drifted.push(ModifiedFile {
                    path: file.path.clone(),
                    kind: ModificationKind::Missing,
                });
                continue;
            }
            let current = match hash::checksum_file(&path) {
                Ok(checksum) => checksum,
                Err(e) => {
                    warn!(path = %path.display(), "unreadable recorded file treated as missing: {e}");
                    drifted.push(ModifiedFile {
                        path: file.path.clone(),
                        kind: ModificationKind::Missing,
                    });
                    continue;
                }
            };
            if !hash::verify_checksum(&file.checksum, &current) {
                drifted.push(ModifiedFile {
                    path: file.path.clone(),
                    kind: ModificationKind::Modified {
                        recorded: file.checksum.clone(),
                        current,
                    },
                });
            }
        }
        Ok(drifted)
    }

    /// Register a change listener; see [`events::EventBus::emit`] for the
    /// reentrancy caveat
    pub fn subscribe(&self, listener: impl Fn(&LockfileEvent) + Send + 'static) -> SubscriptionId {
        self.events.subscribe(Box::new(listener))
    }

    /// Drop a change listener
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.events.unsubscribe(id)
    }

    /// Stop the watcher and silence all change events, including ones
    /// already in flight
    pub fn dispose(&self) {
        self.events.dispose();
        let mut watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *watcher = None;
    }

    fn lock_documents(&self) -> MutexGuard<'_, ()> {
        self.mutate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_watcher(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        let result = watcher::watch_lockfiles(&self.root, move |mode| {
            if let Some(store) = weak.upgrade() {
                let document = store.load_document(&store.document(mode));
                store.events.emit(&LockfileEvent { mode, document });
            }
        });
        match result {
            Ok(w) => {
                let mut watcher = self
                    .watcher
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                *watcher = Some(w);
            }
            // Change events still fire for in-process mutations
            Err(e) => warn!(root = %self.root.display(), "lockfile watcher unavailable: {e}"),
        }
    }

    fn load_document(&self, handle: &DocumentHandle) -> Option<Lockfile> {
        let raw = match fs::read_to_string(&handle.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %handle.label(), "failed to read lockfile: {e}");
                return None;
            }
        };
        match Lockfile::from_json(&raw, &handle.label()) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(path = %handle.label(), "treating corrupted lockfile as absent: {e}");
                None
            }
        }
    }

    /// Atomic write: temp sibling + rename, so a crash mid-write leaves the
    /// original untouched and no reader ever sees a partial document
    fn persist_document(&self, handle: &DocumentHandle, doc: &mut Lockfile) -> Result<()> {
        doc.touch();
        let json = doc.to_json()?;
        common_fs::write_atomic(&handle.path, &json)
            .map_err(|e| lockfile_write_failed(handle.label(), e.to_string()))
    }

    /// Delete a document file; failures are logged and swallowed so the
    /// logical removal still completes for the caller
    fn delete_document(&self, handle: &DocumentHandle) {
        if let Err(e) = fs::remove_file(&handle.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %handle.label(), "failed to delete lockfile: {e}");
            }
        }
        if handle.mode == CommitMode::LocalOnly {
            if let Err(e) = exclude::remove_entry(&self.root, LOCAL_LOCKFILE_NAME) {
                warn!(root = %self.root.display(), "failed to update git exclude: {e}");
            }
        }
    }

    /// Remove one bundle from one document, applying the orphan-source and
    /// empty-document rules; returns the change event when anything changed
    fn remove_from_document(
        &self,
        handle: &DocumentHandle,
        bundle_id: &str,
    ) -> Result<Option<LockfileEvent>> {
        let Some(mut doc) = self.load_document(handle) else {
            return Ok(None);
        };
        if doc.remove_bundle(bundle_id).is_none() {
            return Ok(None);
        }

        doc.prune_orphan_sources();
        doc.prune_orphan_refs();

        if doc.is_empty() {
            self.delete_document(handle);
            Ok(Some(LockfileEvent {
                mode: handle.mode,
                document: None,
            }))
        } else {
            self.persist_document(handle, &mut doc)?;
            Ok(Some(LockfileEvent {
                mode: handle.mode,
                document: Some(doc),
            }))
        }
    }

    fn rollback_target(&self, handle: &DocumentHandle, previous: Option<Lockfile>) {
        let outcome = match previous {
            Some(mut doc) => self.persist_document(handle, &mut doc),
            None => {
                self.delete_document(handle);
                Ok(())
            }
        };
        if let Err(e) = outcome {
            warn!(
                path = %handle.label(),
                "failed to roll back target lockfile after aborted commit-mode move: {e}"
            );
        }
    }

    fn resolve_recorded_path(&self, recorded: &str) -> PathBuf {
        let path = Path::new(recorded);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Drop for LockfileStore {
    fn drop(&mut self) {
        self.events.dispose();
    }
}

fn upsert_record(doc: &mut Lockfile, record: &InstallRecord) {
    let entry = BundleEntry {
        version: record.version.clone(),
        source_id: record.source_id.clone(),
        source_type: record.source_type.clone(),
        installed_at: now_timestamp(),
        files: record.files.clone(),
        hub: record.hub.as_ref().map(|h| h.id.clone()),
        profile: record.profile.as_ref().map(|p| p.id.clone()),
    };
    doc.insert_bundle(record.bundle_id.clone(), entry);
    doc.sources
        .insert(record.source_id.clone(), record.source.clone());

    if let Some(hub) = &record.hub {
        doc.hubs.insert(
            hub.id.clone(),
            HubEntry {
                name: hub.name.clone(),
                url: hub.url.clone(),
            },
        );
    }
    if let Some(profile) = &record.profile {
        let entry = doc
            .profiles
            .entry(profile.id.clone())
            .or_insert_with(|| ProfileEntry {
                name: profile.name.clone(),
                bundle_ids: Vec::new(),
            });
        entry.name.clone_from(&profile.name);
        if !entry.bundle_ids.contains(&record.bundle_id) {
            entry.bundle_ids.push(record.bundle_id.clone());
        }
    }
}

/// Copy the source, hub and profile records a moving bundle points at into
/// the target document
fn copy_references(source_doc: &Lockfile, target_doc: &mut Lockfile, bundle_id: &str, entry: &BundleEntry) {
    if let Some(source) = source_doc.sources.get(&entry.source_id) {
        target_doc
            .sources
            .insert(entry.source_id.clone(), source.clone());
    }
    if let Some(hub_id) = &entry.hub {
        if let Some(hub) = source_doc.hubs.get(hub_id) {
            target_doc.hubs.insert(hub_id.clone(), hub.clone());
        }
    }
    if let Some(profile_id) = &entry.profile {
        if let Some(profile) = source_doc.profiles.get(profile_id) {
            let target_profile = target_doc
                .profiles
                .entry(profile_id.clone())
                .or_insert_with(|| ProfileEntry {
                    name: profile.name.clone(),
                    bundle_ids: Vec::new(),
                });
            if !target_profile.bundle_ids.iter().any(|id| id == bundle_id) {
                target_profile.bundle_ids.push(bundle_id.to_string());
            }
        }
    }
}
