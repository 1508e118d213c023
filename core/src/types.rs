//! Domain DTOs for the book, todo and profile resources.
//!
//! # Design
//! These mirror the documents the backend stores but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift between the two.

use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceId, Singleton};

/// A book in the library collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: ResourceId,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl Resource for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// Request payload for adding a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: ResourceId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Resource for Todo {
    const COLLECTION: &'static str = "todos";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// Partial update for a todo; only `done` is ever patched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    pub done: bool,
}

/// The user's profile. There is exactly one, so it carries no id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
}

impl Singleton for Profile {
    const PATH: &'static str = "profile";
}

/// Partial update for the profile. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}
