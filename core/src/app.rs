//! Application contexts.
//!
//! Each context owns the stores and the route table of one application
//! session. Views borrow the context instead of reaching for global stores;
//! dropping the context ends the session.

use tracing::info;

use crate::books::BooksStore;
use crate::client::HttpClient;
use crate::profile::ProfileStore;
use crate::router::Router;
use crate::todos::TodosStore;

/// The book library: a book list and a form for adding books.
pub struct LibraryApp {
    pub router: Router,
    pub books: BooksStore,
}

impl LibraryApp {
    /// Nothing is fetched; the list view loads books when it is shown.
    pub fn new(http: HttpClient) -> Self {
        Self {
            router: Router::library(),
            books: BooksStore::new(http),
        }
    }
}

/// The todo app: a todo list, the user profile and a contact page.
pub struct TodoApp {
    pub router: Router,
    pub todos: TodosStore,
    pub profile: ProfileStore,
}

impl TodoApp {
    /// Create the stores and load todos and profile concurrently. Load
    /// failures end up in each store's `error`.
    pub async fn start(http: HttpClient) -> Self {
        let app = Self {
            router: Router::todo_app(),
            todos: TodosStore::new(http.clone()),
            profile: ProfileStore::new(http),
        };
        tokio::join!(app.todos.load_todos(), app.profile.load_profile());
        info!(
            todos = app.todos.items().len(),
            todos_error = app.todos.error().is_some(),
            profile_error = app.profile.error().is_some(),
            "todo app started"
        );
        app
    }
}
