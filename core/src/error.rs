//! Error types for the HTTP adapter and the resource stores.
//!
//! # Design
//! Network failures, timeouts and non-2xx statuses all collapse into one
//! `ApiError` so stores handle a single failure signal. `NotFound` keeps a
//! dedicated variant because callers often distinguish "the resource does
//! not exist" from "the server returned an unexpected status".

use std::time::Duration;

use thiserror::Error;

use crate::resource::ResourceId;

/// Errors returned by `HttpClient` and by store actions.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response. Carries the transport's own
    /// message, which may be empty.
    #[error("{0}")]
    Network(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The body matched neither `{"data": T}` nor a bare `T`.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A configuration value from the environment could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A bulk delete stopped at the first item the backend refused.
    #[error("deleted {} item(s), then failed on {failed}: {source}", .deleted.len())]
    PartialDelete {
        deleted: Vec<ResourceId>,
        failed: ResourceId,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// True for failures that happened before any status code was seen.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }
}
