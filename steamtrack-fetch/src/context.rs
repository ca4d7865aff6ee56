//! Fetch context bundling the HTTP client, endpoint bases, and settings.
//!
//! A context is built once per process and shared by every gateway call.

use std::sync::Arc;
use std::time::Duration;

use crate::endpoints::SteamEndpoints;
use crate::error::{FetchError, HttpError};
use crate::http::HttpClient;

// ============================================================================
// Timeout Class
// ============================================================================

/// How long a call is allowed to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    /// Calls returning a single small record.
    Single,
    /// Calls returning lists: owned games with app info, recently played, friends.
    Extended,
    /// Whole-library scans.
    Library,
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for gateway calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Timeout for single-record calls.
    pub timeout: Duration,
    /// Timeout for list calls.
    pub extended_timeout: Duration,
    /// Timeout for whole-library scans.
    pub library_timeout: Duration,
    /// Maximum concurrent per-game sub-calls during library scans.
    pub fanout_concurrency: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            extended_timeout: Duration::from_secs(15),
            library_timeout: Duration::from_secs(30),
            fanout_concurrency: 1,
        }
    }
}

impl FetchSettings {
    /// Timeout for a class of call.
    pub fn timeout_for(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Single => self.timeout,
            TimeoutClass::Extended => self.extended_timeout,
            TimeoutClass::Library => self.library_timeout,
        }
    }

    /// Sets the single-record timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fan-out concurrency, never below one.
    #[must_use]
    pub fn with_fanout_concurrency(mut self, concurrency: usize) -> Self {
        self.fanout_concurrency = concurrency.max(1);
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context shared by gateway calls.
#[derive(Clone)]
pub struct FetchContext {
    /// HTTP client with tracing.
    pub http: Arc<HttpClient>,
    /// Base URLs.
    pub endpoints: SteamEndpoints,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default endpoints and settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the timeout for a class of call.
    pub fn timeout(&self, class: TimeoutClass) -> Duration {
        self.settings.timeout_for(class)
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("endpoints", &self.endpoints)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Debug)]
pub struct FetchContextBuilder {
    http: Option<Arc<HttpClient>>,
    endpoints: SteamEndpoints,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            http: None,
            endpoints: SteamEndpoints::default(),
            settings: FetchSettings::default(),
        }
    }

    /// Sets the HTTP client.
    #[must_use]
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the base URLs.
    #[must_use]
    pub fn endpoints(mut self, endpoints: SteamEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the single-record timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the library scan timeout.
    #[must_use]
    pub fn library_timeout(mut self, timeout: Duration) -> Self {
        self.settings.library_timeout = timeout;
        self
    }

    /// Builds the fetch context.
    ///
    /// Without an explicit client, one is created that only talks to the
    /// configured endpoint hosts.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let client = HttpClient::new()
                    .map_err(|e: HttpError| FetchError::InvalidParameter(e.to_string()))?
                    .with_allowed_domains(self.endpoints.hosts());
                Arc::new(client)
            }
        };

        Ok(FetchContext {
            http,
            endpoints: self.endpoints,
            settings: self.settings,
        })
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
