//! Client-side resource stores for JSON document backends.
//!
//! # Overview
//! A store mirrors a remote collection (`/books`, `/todos`) or singleton
//! (`/profile`) in memory, next to a busy flag and an error slot that views
//! render from. Actions (load, create, update, delete, bulk delete) go
//! through one preconfigured `HttpClient` and apply the server's response
//! to the local state.
//!
//! # Design
//! - `HttpClient` builds plain-data `HttpRequest`s and hands them to a
//!   `Transport` (host-does-IO), so stores are tested against a scripted
//!   `MockTransport` and run against `ureq` in production.
//! - Responses may arrive as `{"data": payload}` or bare; `envelope` accepts
//!   both and rejects anything else.
//! - Store state is published through a `tokio::sync::watch` channel and
//!   actions on one store are serialized, so the busy flag is exact.
//! - Stores are owned by an application context (`LibraryApp`, `TodoApp`)
//!   rather than living in globals.

pub mod app;
pub mod books;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod mock;
pub mod profile;
pub mod resource;
pub mod router;
pub mod state;
pub mod store;
pub mod todos;
pub mod transport;
pub mod types;

pub use app::{LibraryApp, TodoApp};
pub use books::BooksStore;
pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use profile::ProfileStore;
pub use resource::{Resource, ResourceId, Singleton};
pub use router::{Resolution, Route, Router, View};
pub use state::StoreState;
pub use store::{CollectionStore, SingletonStore};
pub use todos::TodosStore;
pub use transport::{Transport, UreqTransport};
pub use types::{Book, NewBook, NewTodo, Profile, ProfileUpdate, Todo, TodoPatch};
