//! Error types for the fetch stage.
//!
//! Every variant carries the URL so the logged cause is useful on its own.

use thiserror::Error;

/// Errors that can occur while fetching an image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body is larger than the configured in-memory limit.
    #[error("image at {url} exceeds the {limit_bytes} byte limit")]
    TooLarge {
        /// The URL whose body was too large.
        url: String,
        /// The configured limit in bytes.
        limit_bytes: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a size-limit error.
    pub fn too_large(url: impl Into<String>, limit_bytes: u64) -> Self {
        Self::TooLarge {
            url: url.into(),
            limit_bytes,
        }
    }
}
