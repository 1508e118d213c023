//! Store for the single user profile.

use std::ops::Deref;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::store::SingletonStore;
use crate::types::{Profile, ProfileUpdate};

pub struct ProfileStore {
    inner: SingletonStore<Profile>,
}

impl ProfileStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: SingletonStore::new(http),
        }
    }

    pub async fn load_profile(&self) {
        self.inner.load().await;
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.inner.update(update).await
    }
}

impl Deref for ProfileStore {
    type Target = SingletonStore<Profile>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
