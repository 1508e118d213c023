//! Store for the library's book collection.

use std::ops::Deref;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::resource::ResourceId;
use crate::store::CollectionStore;
use crate::types::{Book, NewBook};

/// Books mirrored from `/books`. Read state through the `Deref` to
/// [`CollectionStore`].
pub struct BooksStore {
    inner: CollectionStore<Book>,
}

impl BooksStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: CollectionStore::new(http),
        }
    }

    pub async fn load_books(&self) {
        self.inner.load().await;
    }

    pub async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError> {
        self.inner.create(book).await
    }

    pub async fn delete_book(&self, id: &ResourceId) -> Result<(), ApiError> {
        self.inner.delete(id).await
    }
}

impl Deref for BooksStore {
    type Target = CollectionStore<Book>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::mock::MockTransport;

    fn new_book() -> NewBook {
        NewBook {
            title: "A Pál utcai fiúk".to_string(),
            author: "Molnár Ferenc".to_string(),
            year: Some(1906),
            genre: Some("regény".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_delete() {
        let mock = MockTransport::new();
        let store = BooksStore::new(HttpClient::new(ClientConfig::default(), mock.clone()));

        mock.expect(HttpMethod::Get, "/books").respond(200, r#"{"data":[]}"#);
        store.load_books().await;
        assert!(store.items().is_empty());

        mock.expect(HttpMethod::Post, "/books").respond(
            201,
            r#"{"data":{"id":1,"title":"A Pál utcai fiúk","author":"Molnár Ferenc","year":1906,"genre":"regény"}}"#,
        );
        let book = store.create_book(&new_book()).await.unwrap();
        assert_eq!(book.id, ResourceId::from(1));
        assert_eq!(store.items(), vec![book.clone()]);

        let sent: serde_json::Value =
            serde_json::from_str(mock.requests()[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["title"], "A Pál utcai fiúk");
        assert_eq!(sent["year"], 1906);

        mock.expect(HttpMethod::Delete, "/books/1").respond(200, "{}");
        store.delete_book(&book.id).await.unwrap();
        assert!(store.items().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn failed_create_is_returned_to_the_caller() {
        let mock = MockTransport::new();
        let store = BooksStore::new(HttpClient::new(ClientConfig::default(), mock.clone()));

        mock.expect(HttpMethod::Post, "/books").respond(422, "title required");
        let err = store.create_book(&new_book()).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 422, .. }));
        assert_eq!(store.error().as_deref(), Some("HTTP 422: title required"));
        assert!(store.items().is_empty());
    }
}
