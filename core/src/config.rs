//! Client configuration: base address, fixed headers and timeout.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const BASE_URL_VAR: &str = "API_BASE_URL";
const TIMEOUT_VAR: &str = "API_TIMEOUT_MS";

/// Settings every request sent through an `HttpClient` shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Defaults overlaid with `API_BASE_URL` and `API_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(&url);
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::InvalidConfig(format!("{TIMEOUT_VAR}={raw:?}")))?;
            config = config.with_timeout(Duration::from_millis(millis));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header, replacing any existing one with the same
    /// case-insensitive name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.headers.retain(|(existing, _)| *existing != name);
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a path relative to the base address.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_backend_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:3000/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.headers(),
            &[("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://localhost:4000/api/");
        assert_eq!(config.url_for("/books"), "http://localhost:4000/api/books");
        assert_eq!(config.url_for("books/1"), "http://localhost:4000/api/books/1");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "http://backend:8080/api"),
            ("API_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://backend:8080/api");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn unparsable_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("API_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn with_header_replaces_case_insensitively() {
        let config = ClientConfig::default().with_header("Content-Type", "application/merge-patch+json");
        assert_eq!(config.headers().len(), 1);
        assert_eq!(config.headers()[0].1, "application/merge-patch+json");
    }
}
