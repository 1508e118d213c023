//! The I/O seam between `HttpClient` and the network.
//!
//! `HttpClient` builds `HttpRequest` values and interprets `HttpResponse`
//! values; a `Transport` performs the round trip in between. Status codes
//! are returned as data so the client decides what counts as failure.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP request.
///
/// Implementations must not retry and must not treat non-2xx statuses as
/// errors. Only failures that prevent a response (connection refused, DNS,
/// timeout) are returned as `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a blocking `ureq` agent run on tokio's blocking
/// pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request, timeout))
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?
    }
}

fn execute_blocking(
    agent: &ureq::Agent,
    request: HttpRequest,
    timeout: Duration,
) -> Result<HttpResponse, ApiError> {
    debug!(method = %request.method, url = %request.url, "executing request");
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => with_headers(agent.get(&url), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&url), &headers).call(),
        HttpMethod::Post => send(with_headers(agent.post(&url), &headers), body),
        HttpMethod::Patch => send(with_headers(agent.patch(&url), &headers), body),
    };
    let mut response = result.map_err(|e| map_error(e, timeout))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| map_error(e, timeout))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn map_error(err: ureq::Error, timeout: Duration) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout(timeout),
        other => ApiError::Network(other.to_string()),
    }
}
