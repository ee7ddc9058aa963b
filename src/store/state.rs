//! Observable Store State
//!
//! Each store publishes `{ items, is_loading, error }` through a
//! `tokio::sync::watch` channel. Consumers subscribe for change
//! notifications; only the owning store writes.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{DomainError, DomainResult, Entity};

/// Snapshot of a store's state
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    /// Cached entities, in backend/reconciliation order
    pub items: Vec<T>,
    /// An action is in flight
    pub is_loading: bool,
    /// Message of the most recent failure
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

// ========================
// Collection Helpers
// ========================

/// Replace an entity by ID in place, or append it if absent
pub(crate) fn upsert_entity<T: Entity>(items: &mut Vec<T>, entity: T) {
    match items.iter_mut().find(|existing| existing.id() == entity.id()) {
        Some(existing) => *existing = entity,
        None => items.push(entity),
    }
}

/// Remove the entity with `id`; returns whether one was removed
pub(crate) fn remove_entity<T: Entity>(items: &mut Vec<T>, id: &str) -> bool {
    match items.iter().position(|existing| existing.id() == id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Shared, observable state cell for one store
pub(crate) struct StoreHandle<T> {
    state: Arc<watch::Sender<StoreState<T>>>,
}

impl<T> Clone for StoreHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + Sync> StoreHandle<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    /// Run `f` against the current items without cloning them
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.state.borrow().items)
    }

    /// Apply one synchronous mutation to the collection
    pub fn modify_items(&self, f: impl FnOnce(&mut Vec<T>)) {
        self.state.send_modify(|state| f(&mut state.items));
    }

    /// Mark the store busy until the returned guard drops
    fn begin(&self) -> LoadingGuard<'_, T> {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
        LoadingGuard { state: &self.state }
    }

    /// Run one store action: busy on entry, error recorded on failure, busy
    /// cleared on every exit path. The original error is returned.
    pub async fn track<R, F, M>(&self, fallback: M, action: F) -> DomainResult<R>
    where
        F: Future<Output = DomainResult<R>>,
        M: FnOnce() -> String,
    {
        let _loading = self.begin();
        match action.await {
            Ok(value) => Ok(value),
            Err(err) => {
                let message = err.user_message().unwrap_or_else(fallback);
                self.record_failure(&err, message);
                Err(err)
            }
        }
    }

    fn record_failure(&self, err: &DomainError, message: String) {
        tracing::error!(error = ?err, "{}", message);
        self.state.send_modify(|state| state.error = Some(message));
    }
}

/// Clears the busy flag when dropped, including on early return and when
/// the action's future is dropped mid-flight.
struct LoadingGuard<'a, T> {
    state: &'a watch::Sender<StoreState<T>>,
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        self.state.send_modify(|state| state.is_loading = false);
    }
}
