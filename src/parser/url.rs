//! Image URL validation.

use std::fmt;

use tracing::{debug, info, instrument};
use url::Url;

use super::error::{MAX_URL_LENGTH, ParseError};

/// Schemes an image may be fetched from.
pub const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// A validated, normalized image location.
///
/// Only [`validate_image_url`] constructs this type, so holding one means the
/// scheme is http/https and the host is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    url: Url,
}

impl ResourceLocator {
    /// The URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// The host component; never empty.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// The normalized URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Borrow the parsed URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Validates a user-supplied string and returns it as a [`ResourceLocator`].
///
/// # Validation rules:
/// - Must not be blank
/// - Must not exceed `MAX_URL_LENGTH` (2000 chars)
/// - Must be parseable by the `url` crate
/// - Must use http or https scheme (no ftp, file, etc.)
/// - Must have a non-empty host
///
/// # Errors
///
/// Returns [`ParseError`] describing the first rule the input breaks.
///
/// # Examples
///
/// ```
/// use noir_core::parser::validate_image_url;
///
/// let locator = validate_image_url("https://example.com/a.jpg").unwrap();
/// assert_eq!(locator.scheme(), "https");
/// assert_eq!(locator.host(), "example.com");
/// assert!(validate_image_url("ftp://x/y").is_err());
/// ```
#[instrument(level = "debug")]
pub fn validate_image_url(raw: &str) -> Result<ResourceLocator, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyUrl);
    }

    // Check URL length first (prevents memory issues with very long URLs)
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(trimmed));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ParseError::malformed(trimmed, &e.to_string()))?;

    if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ParseError::unsupported_scheme(trimmed, parsed.scheme()));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ParseError::no_host(trimmed));
    }

    info!(url = %parsed, "URL validated");
    Ok(ResourceLocator { url: parsed })
}

/// Advisory form of [`validate_image_url`] that never fails.
#[must_use]
pub fn is_valid_image_url(raw: &str) -> bool {
    match validate_image_url(raw) {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "URL validation failed");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_url_https_preserves_scheme_and_host() {
        let locator = validate_image_url("https://example.com/a.jpg").unwrap();
        assert_eq!(locator.scheme(), "https");
        assert_eq!(locator.host(), "example.com");
        assert_eq!(locator.as_str(), "https://example.com/a.jpg");
    }

    #[test]
    fn test_validate_image_url_http_accepted() {
        let locator = validate_image_url("http://images.example.org/cat.png").unwrap();
        assert_eq!(locator.scheme(), "http");
        assert_eq!(locator.host(), "images.example.org");
    }

    #[test]
    fn test_validate_image_url_trims_and_normalizes() {
        let locator = validate_image_url("  HTTPS://Example.COM  ").unwrap();
        assert_eq!(locator.as_str(), "https://example.com/");
    }

    #[test]
    fn test_validate_image_url_accepts_ip_and_port() {
        let locator = validate_image_url("http://127.0.0.1:8080/img.gif").unwrap();
        assert_eq!(locator.host(), "127.0.0.1");
    }

    #[test]
    fn test_validate_image_url_rejects_blank() {
        assert_eq!(validate_image_url(""), Err(ParseError::EmptyUrl));
        assert_eq!(validate_image_url("   \t\n"), Err(ParseError::EmptyUrl));
    }

    #[test]
    fn test_validate_image_url_rejects_missing_scheme() {
        for raw in ["example.com/a.jpg", "www.example.com", "/images/a.jpg"] {
            let err = validate_image_url(raw).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidUrl { .. }),
                "{raw} should be invalid, got {err:?}"
            );
        }
    }

    #[test]
    fn test_validate_image_url_rejects_missing_host() {
        for raw in ["https://", "http://", "https:///"] {
            assert!(validate_image_url(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_validate_image_url_rejects_unsupported_schemes() {
        for raw in [
            "ftp://x/y",
            "file:///home/user/a.png",
            "mailto:user@example.com",
            "data:image/png;base64,AAAA",
        ] {
            let err = validate_image_url(raw).unwrap_err();
            if let ParseError::InvalidUrl { reason, .. } = &err {
                assert!(reason.contains("unsupported protocol"), "{raw}: {reason}");
            } else {
                panic!("Expected InvalidUrl for {raw}, got {err:?}");
            }
        }
    }

    #[test]
    fn test_validate_image_url_rejects_too_long() {
        let long_url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_image_url(&long_url),
            Err(ParseError::UrlTooLong { .. })
        ));
    }

    #[test]
    fn test_is_valid_image_url_swallows_errors() {
        assert!(is_valid_image_url("https://example.com/a.jpg"));
        assert!(!is_valid_image_url("ftp://x/y"));
        assert!(!is_valid_image_url(""));
        assert!(!is_valid_image_url("not a url"));
    }

    #[test]
    fn test_resource_locator_display_matches_as_str() {
        let locator = validate_image_url("https://example.com/a b.jpg").unwrap();
        assert_eq!(locator.to_string(), locator.as_str());
        assert!(locator.as_str().contains("a%20b.jpg"));
    }
}
