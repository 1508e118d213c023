//! Generic resource stores: an in-memory mirror of a remote collection or
//! singleton, plus a busy flag and an error slot.
//!
//! # Design
//! Every action runs the same template:
//! 1. take the store's single-flight lock, set `is_loading` and clear `error`;
//! 2. perform one `HttpClient` call (bulk delete: one per matching item);
//! 3. on success apply the decoded payload to the local state;
//! 4. on failure record a message in `error`, log it, and either swallow it
//!    (`load`) or return it (every mutating action);
//! 5. clear `is_loading` on every exit path.
//!
//! Actions on one store are serialized, so the busy flag always describes
//! exactly one action. Separate stores run independently.

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::resource::{Resource, ResourceId, Singleton};
use crate::state::{StateCell, StoreState};

/// Mirror of a remote collection such as `/todos`.
pub struct CollectionStore<R: Resource> {
    http: HttpClient,
    state: StateCell<Vec<R>>,
    flight: Mutex<()>,
}

impl<R: Resource> CollectionStore<R> {
    /// Starts empty; nothing is fetched until [`load`](Self::load).
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            state: StateCell::new(Vec::new()),
            flight: Mutex::new(()),
        }
    }

    pub fn state(&self) -> StoreState<Vec<R>> {
        self.state.snapshot()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<R>>> {
        self.state.subscribe()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.read(|state| state.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|state| state.error.clone())
    }

    /// Replace the whole collection with the server's. Failures are kept in
    /// `error` and not returned.
    #[instrument(skip_all, fields(resource = R::COLLECTION))]
    pub async fn load(&self) {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.fetch_all().await;
        if let Ok(items) = self.state.settle(R::COLLECTION, "load", result) {
            debug!(count = items.len(), "loaded collection");
            self.state.modify(|state| state.data = items);
        }
    }

    /// Create an item and append the server's copy to the end of the
    /// collection.
    #[instrument(skip_all, fields(resource = R::COLLECTION))]
    pub async fn create<B>(&self, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.post(body).await;
        let item = self.state.settle(R::COLLECTION, "create", result)?;
        info!(id = %item.id(), "created item");
        let appended = item.clone();
        self.state.modify(|state| state.data.push(appended));
        Ok(item)
    }

    /// Patch item `id` and replace the local copy with the server's. When
    /// `id` is not in the local collection the collection is left as is.
    #[instrument(skip_all, fields(resource = R::COLLECTION, id = %id))]
    pub async fn update<B>(&self, id: &ResourceId, patch: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.patch(id, patch).await;
        let item = self.state.settle(R::COLLECTION, "update", result)?;
        let replacement = item.clone();
        let replaced = self.state.modify_if(|state| {
            match state.data.iter_mut().find(|existing| existing.id() == id) {
                Some(slot) => {
                    *slot = replacement;
                    true
                }
                None => false,
            }
        });
        if replaced {
            info!("updated item");
        } else {
            warn!("updated item is not in the local collection");
        }
        Ok(item)
    }

    /// Delete item `id` remotely, then drop it locally. On failure the
    /// local collection is untouched.
    #[instrument(skip_all, fields(resource = R::COLLECTION, id = %id))]
    pub async fn delete(&self, id: &ResourceId) -> Result<(), ApiError> {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.http.delete(&R::item_path(id)).await.map(drop);
        self.state.settle(R::COLLECTION, "delete", result)?;
        info!("deleted item");
        self.state.modify(|state| state.data.retain(|item| item.id() != id));
        Ok(())
    }

    /// Delete every item matching `predicate`, one request at a time in
    /// collection order. Returns how many items were deleted.
    ///
    /// Stops at the first failure. Items already deleted remotely are
    /// dropped locally; the failing item and the ones after it stay, and
    /// the error is `ApiError::PartialDelete`.
    #[instrument(skip_all, fields(resource = R::COLLECTION))]
    pub async fn delete_where<F>(&self, predicate: F) -> Result<usize, ApiError>
    where
        F: Fn(&R) -> bool + Send,
    {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let targets: Vec<ResourceId> = self.state.read(|state| {
            state
                .data
                .iter()
                .filter(|&item| predicate(item))
                .map(|item| item.id().clone())
                .collect()
        });
        debug!(count = targets.len(), "bulk delete");

        let mut deleted = Vec::with_capacity(targets.len());
        for id in targets {
            if let Err(source) = self.http.delete(&R::item_path(&id)).await {
                self.state
                    .modify(|state| state.data.retain(|item| !deleted.contains(item.id())));
                let err = ApiError::PartialDelete {
                    deleted,
                    failed: id,
                    source: Box::new(source),
                };
                return self.state.settle(R::COLLECTION, "delete", Err(err));
            }
            deleted.push(id);
        }

        info!(count = deleted.len(), "bulk delete finished");
        self.state.modify(|state| state.data.retain(|item| !predicate(item)));
        Ok(deleted.len())
    }

    async fn fetch_all(&self) -> Result<Vec<R>, ApiError> {
        self.http.get(&R::collection_path()).await?.json()
    }

    async fn post<B>(&self, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.http.post(&R::collection_path(), body).await?.json()
    }

    async fn patch<B>(&self, id: &ResourceId, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.http.patch(&R::item_path(id), body).await?.json()
    }
}

/// Mirror of a remote singleton such as `/profile`.
pub struct SingletonStore<S: Singleton> {
    http: HttpClient,
    state: StateCell<S>,
    flight: Mutex<()>,
}

impl<S: Singleton> SingletonStore<S> {
    /// Starts from `S::default()`.
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            state: StateCell::new(S::default()),
            flight: Mutex::new(()),
        }
    }

    pub fn state(&self) -> StoreState<S> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<S>> {
        self.state.subscribe()
    }

    pub fn data(&self) -> S {
        self.state.read(|state| state.data.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|state| state.error.clone())
    }

    /// Replace the local value with the server's. Failures are kept in
    /// `error` and not returned.
    #[instrument(skip_all, fields(resource = S::PATH))]
    pub async fn load(&self) {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.fetch().await;
        if let Ok(value) = self.state.settle(S::PATH, "load", result) {
            debug!("loaded singleton");
            self.state.modify(|state| state.data = value);
        }
    }

    /// Patch the resource and replace the local value with the server's.
    #[instrument(skip_all, fields(resource = S::PATH))]
    pub async fn update<B>(&self, patch: &B) -> Result<S, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let _flight = self.flight.lock().await;
        let _busy = self.state.begin();

        let result = self.send_patch(patch).await;
        let value = self.state.settle(S::PATH, "update", result)?;
        info!("updated singleton");
        let replacement = value.clone();
        self.state.modify(|state| state.data = replacement);
        Ok(value)
    }

    async fn fetch(&self) -> Result<S, ApiError> {
        self.http.get(&S::path()).await?.json()
    }

    async fn send_patch<B>(&self, body: &B) -> Result<S, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.http.patch(&S::path(), body).await?.json()
    }
}
