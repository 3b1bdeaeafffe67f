//! Error types for image URL validation.

use thiserror::Error;

/// Maximum URL length to accept (standard browser limit).
/// URLs longer than this are rejected to prevent memory issues.
pub const MAX_URL_LENGTH: usize = 2000;

/// Errors that can occur while validating a user-supplied image URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or whitespace only.
    #[error("URL cannot be empty")]
    EmptyUrl,

    /// URL is malformed, uses an unsupported scheme, or has no host
    #[error("'{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed validation
        url: String,
        /// Why the URL is invalid
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// URL exceeds maximum allowed length
    #[error("URL too long ({length} chars, max {max}): {url_preview}...")]
    UrlTooLong {
        /// Truncated URL for display
        url_preview: String,
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl ParseError {
    /// How the operator could fix the input, kept out of `Display` so the
    /// error stays on one line.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::EmptyUrl => None,
            Self::InvalidUrl { suggestion, .. } => Some(suggestion),
            Self::UrlTooLong { .. } => {
                Some("Use a URL shortener or check for extraneous content")
            }
        }
    }

    /// Creates an `InvalidUrl` error for a scheme other than http/https.
    #[must_use]
    pub fn unsupported_scheme(url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported protocol '{scheme}'"),
            suggestion: "Use http:// or https:// URLs".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: format!("invalid URL format: {parse_error}"),
            suggestion: "Check the URL format and try again".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a URL without a host.
    #[must_use]
    pub fn no_host(url: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: "URL must have a valid host".to_string(),
            suggestion: "Ensure the URL includes a domain (e.g., example.com)".to_string(),
        }
    }

    /// Creates a `UrlTooLong` error for URLs exceeding the maximum length.
    #[must_use]
    pub fn too_long(url: &str) -> Self {
        Self::UrlTooLong {
            url_preview: url.chars().take(50).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }
}
