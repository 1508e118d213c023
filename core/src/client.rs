//! The preconfigured HTTP client every store talks through.
//!
//! # Design
//! `HttpClient` holds a `ClientConfig` and a shared `Transport` and carries
//! no other state. Each call is split into `build_request`, which produces a
//! plain `HttpRequest`, and `send`, which executes it under the configured
//! timeout and maps the status code. Requests are never retried.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    /// Client using the blocking `ureq` transport with the config's timeout.
    pub fn with_ureq(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::new(config, transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request for `path`, relative to the configured base URL.
    /// Every configured header is attached; `body` is encoded as JSON.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.config.url_for(path),
            headers: self.config.headers().to_vec(),
            body,
        })
    }

    /// Execute `request` and return the response if its status is 2xx.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let timeout = self.config.timeout();
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = tokio::time::timeout(timeout, self.transport.execute(request))
            .await
            .map_err(|_| ApiError::Timeout(timeout))??;
        check_status(response)
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        let request = self.build_request::<()>(HttpMethod::Get, path, None)?;
        self.send(request).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.build_request(HttpMethod::Post, path, Some(body))?;
        self.send(request).await
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.build_request(HttpMethod::Patch, path, Some(body))?;
        self.send(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        let request = self.build_request::<()>(HttpMethod::Delete, path, None)?;
        self.send(request).await
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::mock::MockTransport;

    fn client(mock: &MockTransport) -> HttpClient {
        HttpClient::new(ClientConfig::new("http://localhost:3000/api"), mock.clone())
    }

    #[test]
    fn build_get_has_no_body_but_keeps_headers() {
        let http = client(&MockTransport::new());
        let req = http.build_request::<()>(HttpMethod::Get, "/books", None).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/books");
        assert!(req.body.is_none());
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_post_encodes_the_body() {
        let http = client(&MockTransport::new());
        let req = http
            .build_request(HttpMethod::Post, "/todos", Some(&json!({"text": "milk", "done": false})))
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["text"], "milk");
        assert_eq!(body["done"], false);
    }

    #[tokio::test]
    async fn success_status_returns_the_response() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Post, "/books").respond(201, r#"{"data":{"id":1}}"#);
        let response = client(&mock).post("/books", &json!({"title": "x"})).await.unwrap();
        assert_eq!(response.status, 201);
        mock.verify();
    }

    #[tokio::test]
    async fn not_found_maps_to_dedicated_variant() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Delete, "/books/9").respond(404, "");
        let err = client(&mock).delete("/books/9").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Patch, "/profile").respond(500, "boom");
        let err = client(&mock).patch("/profile", &json!({})).await.unwrap_err();
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_transport_times_out() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "/todos")
            .after(Duration::from_secs(5))
            .respond(200, "[]");
        let http = HttpClient::new(
            ClientConfig::default().with_timeout(Duration::from_millis(20)),
            mock.clone(),
        );
        let err = http.get("/todos").await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let mock = MockTransport::new();
        mock.expect(HttpMethod::Get, "/todos")
            .fail(ApiError::Network("connection refused".to_string()));
        let err = client(&mock).get("/todos").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(mock.requests().len(), 1);
        mock.verify();
    }
}
