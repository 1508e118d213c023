//! Observable store state and the busy/error bookkeeping every action shares.

use tokio::sync::watch;
use tracing::error;

use crate::error::ApiError;

/// What a view renders from: the mirrored data, the busy flag and the last
/// action's error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> StoreState<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
        }
    }
}

impl<T: Default> Default for StoreState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Owns the `watch` channel a store publishes its state through.
///
/// Updates go through `send_modify`, which applies the change even while
/// nobody is subscribed.
pub(crate) struct StateCell<T> {
    tx: watch::Sender<StoreState<T>>,
}

impl<T: Clone> StateCell<T> {
    pub(crate) fn new(data: T) -> Self {
        let (tx, _rx) = watch::channel(StoreState::new(data));
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> StoreState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn read<U>(&self, f: impl FnOnce(&StoreState<T>) -> U) -> U {
        f(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.tx.subscribe()
    }

    /// Mark an action as started. The flag is cleared when the guard drops,
    /// including when the action's future is dropped mid-flight.
    pub(crate) fn begin(&self) -> Busy<'_, T> {
        self.tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
        Busy { tx: &self.tx }
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut StoreState<T>)) {
        self.tx.send_modify(f);
    }

    /// Like [`modify`](Self::modify), but subscribers are only notified when
    /// `f` returns true.
    pub(crate) fn modify_if(&self, f: impl FnOnce(&mut StoreState<T>) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Record a failed action in the error slot and pass the result through.
    pub(crate) fn settle<U>(
        &self,
        resource: &'static str,
        action: &'static str,
        result: Result<U, ApiError>,
    ) -> Result<U, ApiError> {
        if let Err(err) = &result {
            error!(resource, action, error = %err, "store action failed");
            let message = display_message(err, resource, action);
            self.tx.send_modify(|state| state.error = Some(message));
        }
        result
    }
}

/// Clears `is_loading` on drop.
pub(crate) struct Busy<'a, T> {
    tx: &'a watch::Sender<StoreState<T>>,
}

impl<T> Drop for Busy<'_, T> {
    fn drop(&mut self) {
        self.tx.send_modify(|state| state.is_loading = false);
    }
}

fn display_message(err: &ApiError, resource: &str, action: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        format!("failed to {action} {resource}")
    } else {
        message
    }
}
