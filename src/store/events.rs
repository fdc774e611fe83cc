//! Change notification for the lockfile store
//!
//! A small callback registry with a deterministic teardown guarantee: the
//! disposed flag is checked under the same lock that delivers events, so no
//! listener runs after [`EventBus::dispose`] returns, including for watcher
//! events already in flight.

use std::sync::{Mutex, PoisonError};

use crate::config::lockfile::Lockfile;

use super::CommitMode;

/// A lockfile change notification
///
/// `document` is `None` when the document was deleted (its last bundle was
/// removed).
#[derive(Debug, Clone)]
pub struct LockfileEvent {
    /// Which of the two documents changed
    pub mode: CommitMode,

    /// The document contents after the change, or `None` when deleted
    pub document: Option<Lockfile>,
}

/// Handle returned by [`super::LockfileStore::subscribe`]
pub type SubscriptionId = usize;

type Listener = Box<dyn Fn(&LockfileEvent) + Send>;

struct BusState {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
    disposed: bool,
}

pub(crate) struct EventBus {
    inner: Mutex<BusState>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BusState {
                listeners: Vec::new(),
                next_id: 0,
                disposed: false,
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, BusState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a listener; inert when the bus is already disposed
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        if !state.disposed {
            state.listeners.push((id, listener));
        }
        id
    }

    /// Drop a listener; unknown ids are ignored
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.state().listeners.retain(|(lid, _)| *lid != id);
    }

    /// Deliver an event to every listener
    ///
    /// Listeners run under the registry lock and must not call back into the
    /// subscription API or mutate the store from inside the callback.
    pub fn emit(&self, event: &LockfileEvent) {
        let state = self.state();
        if state.disposed {
            return;
        }
        for (_, listener) in &state.listeners {
            listener(event);
        }
    }

    /// Tear down: clears all listeners and silences every later emit
    pub fn dispose(&self) {
        let mut state = self.state();
        state.disposed = true;
        state.listeners.clear();
    }
}
