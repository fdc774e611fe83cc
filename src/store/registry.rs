//! Explicit per-root store cache
//!
//! One [`LockfileStore`] instance exists per repository root. The registry is
//! owned by the composing application and handed to whatever needs a store
//! (dependency injection, not a process-wide global), so tests can construct
//! fresh stores per case via [`LockfileStore::open`] instead of resetting
//! shared state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use normpath::PathExt;

use crate::error::Result;

use super::LockfileStore;

#[derive(Default)]
pub struct StoreRegistry {
    stores: Mutex<HashMap<PathBuf, Arc<LockfileStore>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for a repository root, constructing it on first acquisition
    pub fn store_for(&self, root: &Path) -> Result<Arc<LockfileStore>> {
        let key = root
            .normalize()
            .map(normpath::BasePathBuf::into_path_buf)
            .unwrap_or_else(|_| root.to_path_buf());

        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(&key) {
            return Ok(store.clone());
        }
        let store = LockfileStore::open(root)?;
        stores.insert(key, store.clone());
        Ok(store)
    }

    /// Dispose every cached store and empty the registry
    pub fn dispose_all(&self) {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, store) in stores.drain() {
            store.dispose();
        }
    }
}
