//! # Mock Transport
//!
//! A scripted [`Transport`] for testing stores without a backend.
//!
//! Queue expectations with [`MockTransport::expect`], hand the transport to
//! an `HttpClient`, run store actions, then call
//! [`MockTransport::verify`] to ensure every expectation was consumed.
//!
//! ```ignore
//! let mock = MockTransport::new();
//! mock.expect(HttpMethod::Get, "/todos").respond(200, r#"{"data":[]}"#);
//! let http = HttpClient::new(ClientConfig::default(), mock.clone());
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

enum Reply {
    Response(HttpResponse),
    Failure(ApiError),
}

struct Expectation {
    method: HttpMethod,
    path: String,
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Script {
    expectations: VecDeque<Expectation>,
    received: Vec<HttpRequest>,
}

/// Transport that replays queued replies in order and records every request.
///
/// Expectations match on method and on the path suffix of the request URL,
/// so tests stay independent of the configured base address. A request that
/// does not match the next expectation panics.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a request with `method` whose URL ends with `path`.
    pub fn expect(&self, method: HttpMethod, path: &str) -> ExpectationBuilder<'_> {
        ExpectationBuilder {
            mock: self,
            method,
            path: path.to_string(),
            delay: None,
        }
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().received.clone()
    }

    /// Panics if queued expectations were never consumed.
    pub fn verify(&self) {
        let script = self.script.lock().unwrap();
        if let Some(next) = script.expectations.front() {
            panic!(
                "{} unmet expectation(s), next: {} {}",
                script.expectations.len(),
                next.method,
                next.path
            );
        }
    }

    fn push(&self, expectation: Expectation) {
        self.script.lock().unwrap().expectations.push_back(expectation);
    }
}

/// Completes an expectation started by [`MockTransport::expect`].
pub struct ExpectationBuilder<'a> {
    mock: &'a MockTransport,
    method: HttpMethod,
    path: String,
    delay: Option<Duration>,
}

impl ExpectationBuilder<'_> {
    /// Sleep before replying, e.g. to trip the client timeout.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(self, status: u16, body: &str) {
        self.finish(Reply::Response(HttpResponse::new(status, body)));
    }

    pub fn respond_json(self, status: u16, body: serde_json::Value) {
        self.finish(Reply::Response(HttpResponse::new(status, body.to_string())));
    }

    /// Fail at the transport level, before any status code.
    pub fn fail(self, error: ApiError) {
        self.finish(Reply::Failure(error));
    }

    fn finish(self, reply: Reply) {
        self.mock.push(Expectation {
            method: self.method,
            path: self.path,
            reply,
            delay: self.delay,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let expectation = {
            let mut script = self.script.lock().unwrap();
            script.received.push(request.clone());
            script.expectations.pop_front()
        };

        let Some(expectation) = expectation else {
            panic!("unexpected request: {} {}", request.method, request.url);
        };
        assert_eq!(
            expectation.method, request.method,
            "method mismatch for {}",
            request.url
        );
        assert!(
            request.url.ends_with(&expectation.path),
            "expected path {}, got {}",
            expectation.path,
            request.url
        );

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        match expectation.reply {
            Reply::Response(response) => Ok(response),
            Reply::Failure(error) => Err(error),
        }
    }
}
