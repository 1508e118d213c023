//! Store for the todo list.

use std::ops::Deref;

use tracing::debug;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::store::CollectionStore;
use crate::types::{NewTodo, Todo, TodoPatch};

/// Todos mirrored from `/todos`. Read state through the `Deref` to
/// [`CollectionStore`].
pub struct TodosStore {
    inner: CollectionStore<Todo>,
}

impl TodosStore {
    pub fn new(http: HttpClient) -> Self {
        Self {
            inner: CollectionStore::new(http),
        }
    }

    pub async fn load_todos(&self) {
        self.inner.load().await;
    }

    /// Add a todo with the trimmed `text`. Blank text sends nothing, leaves
    /// the state alone and returns `Ok(None)`.
    pub async fn add_todo(&self, text: &str) -> Result<Option<Todo>, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank todo");
            return Ok(None);
        }
        let input = NewTodo {
            text: text.to_string(),
            done: false,
        };
        self.inner.create(&input).await.map(Some)
    }

    /// Flip `done` on the server and take the server's copy.
    pub async fn toggle_todo(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let patch = TodoPatch { done: !todo.done };
        self.inner.update(&todo.id, &patch).await
    }

    /// Delete every finished todo. Returns how many were deleted.
    pub async fn delete_done_todos(&self) -> Result<usize, ApiError> {
        self.inner.delete_where(|todo: &Todo| todo.done).await
    }

    /// Number of todos not yet done.
    pub fn remaining(&self) -> usize {
        self.inner.items().iter().filter(|todo| !todo.done).count()
    }
}

impl Deref for TodosStore {
    type Target = CollectionStore<Todo>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::mock::MockTransport;
    use crate::resource::ResourceId;

    fn todo(id: i64, text: &str, done: bool) -> Todo {
        Todo {
            id: ResourceId::from(id),
            text: text.to_string(),
            done,
        }
    }

    async fn loaded(mock: &MockTransport, todos: serde_json::Value) -> TodosStore {
        let store = TodosStore::new(HttpClient::new(ClientConfig::default(), mock.clone()));
        mock.expect(HttpMethod::Get, "/todos")
            .respond_json(200, json!({ "data": todos }));
        store.load_todos().await;
        store
    }

    #[tokio::test]
    async fn add_todo_trims_and_appends() {
        let mock = MockTransport::new();
        let store = loaded(&mock, json!([{"id": 1, "text": "milk", "done": false}])).await;

        mock.expect(HttpMethod::Post, "/todos")
            .respond(201, r#"{"data":{"id":2,"text":"bread","done":false}}"#);
        let added = store.add_todo("  bread  ").await.unwrap();

        assert_eq!(added, Some(todo(2, "bread", false)));
        assert_eq!(
            store.items(),
            vec![todo(1, "milk", false), todo(2, "bread", false)]
        );
        let sent: serde_json::Value =
            serde_json::from_str(mock.requests()[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"text": "bread", "done": false}));
    }

    #[tokio::test]
    async fn blank_todo_sends_nothing() {
        let mock = MockTransport::new();
        let store = loaded(&mock, json!([])).await;

        assert_eq!(store.add_todo("   ").await.unwrap(), None);
        assert_eq!(mock.requests().len(), 1);
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn toggle_sends_the_flipped_flag() {
        let mock = MockTransport::new();
        let store = loaded(
            &mock,
            json!([{"id": 1, "text": "a", "done": false}, {"id": 2, "text": "b", "done": false}]),
        )
        .await;

        mock.expect(HttpMethod::Patch, "/todos/2")
            .respond(200, r#"{"data":{"id":2,"text":"b","done":true}}"#);
        let current = store.items()[1].clone();
        let toggled = store.toggle_todo(&current).await.unwrap();

        assert!(toggled.done);
        assert_eq!(mock.requests()[1].body.as_deref(), Some(r#"{"done":true}"#));
        assert_eq!(store.items(), vec![todo(1, "a", false), todo(2, "b", true)]);
        assert_eq!(store.remaining(), 1);
    }

    #[tokio::test]
    async fn delete_done_keeps_open_todos() {
        let mock = MockTransport::new();
        let store = loaded(
            &mock,
            json!([
                {"id": 1, "text": "a", "done": true},
                {"id": 2, "text": "b", "done": false},
                {"id": 3, "text": "c", "done": true}
            ]),
        )
        .await;

        mock.expect(HttpMethod::Delete, "/todos/1").respond(200, "{}");
        mock.expect(HttpMethod::Delete, "/todos/3").respond(200, "{}");
        assert_eq!(store.delete_done_todos().await.unwrap(), 2);
        assert_eq!(store.items(), vec![todo(2, "b", false)]);
        mock.verify();
    }
}
