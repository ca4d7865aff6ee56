//! HTTP client with tracing and a domain allowlist.
//!
//! Wraps `reqwest` so that:
//! - each request carries its own timeout
//! - the body is read inside that timeout
//! - errors never carry the request URL (it contains the API key)

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default client-wide timeout; individual requests usually set a shorter one.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Steam Tracker.
const USER_AGENT: &str = concat!("steamtrack/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Response
// ============================================================================

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom client-wide timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &Url) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = url
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request and reads the body, all within `timeout`.
    ///
    /// Only the URL path is recorded in spans; the query holds the API key.
    #[instrument(skip(self, url), fields(path = %url.path()))]
    pub async fn get(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, HttpError> {
        self.is_domain_allowed(url)?;
        debug!(?timeout, "GET request");

        let response = self
            .inner
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        debug!(status, "Response received");

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::from_reqwest(e, timeout))?;

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================
