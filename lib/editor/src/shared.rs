//! Shared handle to a [`GraphStore`].

use crate::store::GraphStore;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle through which the canvas, inspector and async actions
/// observe one store.
///
/// The lock is only taken for synchronous reads and mutations, never across
/// an `.await`, so the store stays readable and mutable while a backend
/// request is in flight.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<GraphStore>>,
}

impl SharedStore {
    #[must_use]
    pub fn new(store: GraphStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs a read-only closure against the store.
    pub fn read<T>(&self, f: impl FnOnce(&GraphStore) -> T) -> T {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs a mutating closure against the store.
    pub fn update<T>(&self, f: impl FnOnce(&mut GraphStore) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Clones the current store state.
    #[must_use]
    pub fn snapshot(&self) -> GraphStore {
        self.read(Clone::clone)
    }
}

impl From<GraphStore> for SharedStore {
    fn from(store: GraphStore) -> Self {
        Self::new(store)
    }
}
