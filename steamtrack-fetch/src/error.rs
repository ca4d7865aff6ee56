//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

use crate::endpoints::Endpoint;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for gateway calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No usable response: connect failure, timeout, or body read failure.
    #[error("{endpoint}: transport error: {message}")]
    Transport {
        /// The endpoint that was called.
        endpoint: Endpoint,
        /// What went wrong.
        message: String,
    },

    /// A response arrived but was not a success or lacked the expected shape.
    #[error("{endpoint}: upstream error: {message}")]
    Upstream {
        /// The endpoint that was called.
        endpoint: Endpoint,
        /// HTTP status, when the failure was a non-success status.
        status: Option<u16>,
        /// What went wrong.
        message: String,
    },

    /// The call was rejected before any network I/O.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl FetchError {
    /// Creates a transport error.
    pub fn transport(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint,
            message: message.into(),
        }
    }

    /// Creates an upstream error for a malformed success response.
    pub fn malformed(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self::Upstream {
            endpoint,
            status: None,
            message: message.into(),
        }
    }

    /// Creates an upstream error for a non-success status.
    pub fn status(endpoint: Endpoint, status: u16) -> Self {
        Self::Upstream {
            endpoint,
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }

    /// Wraps an HTTP client error for the given endpoint.
    pub fn from_http(endpoint: Endpoint, err: HttpError) -> Self {
        match err {
            HttpError::DomainNotAllowed(_) | HttpError::InvalidUrl(_) => {
                Self::InvalidParameter(err.to_string())
            }
            HttpError::Request(_) | HttpError::Timeout(_) | HttpError::Build(_) => {
                Self::transport(endpoint, err.to_string())
            }
        }
    }

    /// The endpoint involved, if the call reached the network layer.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. } | Self::Upstream { endpoint, .. } => Some(*endpoint),
            Self::InvalidParameter(_) => None,
        }
    }

    /// Returns true for transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true for upstream failures.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error. The URL is stripped so the API key never reaches logs.
    #[error("Request error: {0}")]
    Request(reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl HttpError {
    /// Classifies a reqwest error, stripping its URL.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(err.without_url())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_classification() {
        let err = FetchError::from_http(
            Endpoint::Badges,
            HttpError::Timeout(Duration::from_secs(10)),
        );
        assert!(err.is_transport());
        assert_eq!(err.endpoint(), Some(Endpoint::Badges));

        let err = FetchError::from_http(
            Endpoint::Badges,
            HttpError::DomainNotAllowed("evil.com".to_string()),
        );
        assert!(matches!(err, FetchError::InvalidParameter(_)));
        assert_eq!(err.endpoint(), None);
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::status(Endpoint::OwnedGames, 503);
        assert!(err.is_upstream());
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.to_string().contains("owned games"));
    }
}
