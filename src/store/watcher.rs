//! Debounced filesystem watching for the two lockfile documents
//!
//! External edits (a `git pull` bringing in a teammate's committed lockfile,
//! a hand edit) must re-fire the store's change event without any store
//! mutation happening in-process.

use std::path::Path;
use std::time::Duration;

use notify_debouncer_full::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_full::{DebounceEventResult, Debouncer, FileIdMap, new_debouncer};
use tracing::warn;

use crate::config::lockfile::{LOCAL_LOCKFILE_NAME, LOCKFILE_NAME};
use crate::error::{Result, io_error};

use super::CommitMode;

pub(crate) type LockfileWatcher = Debouncer<RecommendedWatcher, FileIdMap>;

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Start a debounced watcher on the repository root that reports which
/// lockfile changed
///
/// The root is watched non-recursively (the two documents sit directly in
/// it) and events for unrelated files are filtered out.
pub(crate) fn watch_lockfiles<F>(root: &Path, on_change: F) -> Result<LockfileWatcher>
where
    F: Fn(CommitMode) + Send + 'static,
{
    let mut debouncer = new_debouncer(
        DEBOUNCE,
        None,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let mut main_changed = false;
                let mut local_changed = false;
                for event in &events {
                    for path in &event.paths {
                        match path.file_name().and_then(|n| n.to_str()) {
                            Some(LOCKFILE_NAME) => main_changed = true,
                            Some(LOCAL_LOCKFILE_NAME) => local_changed = true,
                            _ => {}
                        }
                    }
                }
                if main_changed {
                    on_change(CommitMode::Commit);
                }
                if local_changed {
                    on_change(CommitMode::LocalOnly);
                }
            }
            Err(errors) => {
                for e in errors {
                    warn!(err = %e, "lockfile watcher error");
                }
            }
        },
    )
    .map_err(|e| io_error(e.to_string()))?;

    debouncer
        .watcher()
        .watch(root, RecursiveMode::NonRecursive)
        .map_err(|e| io_error(e.to_string()))?;

    Ok(debouncer)
}
