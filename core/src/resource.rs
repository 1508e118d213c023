//! Traits binding a Rust type to a remote resource path.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Backend-assigned identifier of a collection item.
///
/// JSON document backends hand out either integers or strings, so both are
/// accepted. Fractional numbers are not identifiers and fail to decode.
/// Equality is strict: `1` and `"1"` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

/// RFC 3986 unreserved characters stay literal inside a path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl ResourceId {
    /// The id as a single percent-encoded URL path segment.
    pub fn path_segment(&self) -> String {
        match self {
            ResourceId::Number(n) => n.to_string(),
            ResourceId::Text(s) => utf8_percent_encode(s, SEGMENT).to_string(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Number(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Text(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Text(s)
    }
}

/// An item of a remote collection, e.g. a book under `/books`.
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Collection segment, without slashes.
    const COLLECTION: &'static str;

    fn id(&self) -> &ResourceId;

    fn collection_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    fn item_path(id: &ResourceId) -> String {
        format!("/{}/{}", Self::COLLECTION, id.path_segment())
    }
}

/// A remote resource with exactly one instance and no identifier, e.g.
/// `/profile`.
pub trait Singleton: Clone + fmt::Debug + Default + DeserializeOwned + Send + Sync + 'static {
    /// Resource segment, without slashes.
    const PATH: &'static str;

    fn path() -> String {
        format!("/{}", Self::PATH)
    }
}
