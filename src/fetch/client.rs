//! HTTP client that fetches an image body into memory.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, info, instrument};

use super::Fetcher;
use super::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_MAX_IMAGE_BYTES, READ_TIMEOUT_SECS};
use super::error::FetchError;
use crate::parser::ResourceLocator;
use crate::payload::Payload;
use crate::user_agent;

/// Tunables for [`HttpFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Total request timeout, body included.
    pub read_timeout: Duration,
    /// Largest body accepted, in bytes.
    pub max_image_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// [`Fetcher`] backed by `reqwest`.
///
/// Create once and reuse; the inner client pools connections.
///
/// # Example
///
/// ```no_run
/// use noir_core::fetch::{FetchSettings, Fetcher, HttpFetcher};
/// use noir_core::parser::validate_image_url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::new(FetchSettings::default())?;
/// let locator = validate_image_url("https://example.com/cat.jpg")?;
/// let payload = fetcher.fetch(&locator).await?;
/// println!("fetched {} bytes", payload.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_image_bytes: u64,
}

impl HttpFetcher {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if reqwest rejects the configuration.
    #[instrument(level = "debug")]
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.read_timeout)
            .gzip(true)
            .user_agent(user_agent::default_fetch_user_agent())
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self {
            client,
            max_image_bytes: settings.max_image_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %locator))]
    async fn fetch(&self, locator: &ResourceLocator) -> Result<Payload, FetchError> {
        let url = locator.as_str();
        debug!("fetching image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        if let Some(declared) = response.content_length()
            && declared > self.max_image_bytes
        {
            debug!(declared, "declared content length over limit");
            return Err(FetchError::too_large(url, self.max_image_bytes));
        }

        let body = read_limited_body(response, url, self.max_image_bytes).await?;
        info!(bytes = body.len(), "image fetched");
        Ok(Payload::new(body))
    }
}

/// Collects the body, failing as soon as it grows past `limit` bytes.
async fn read_limited_body(
    response: reqwest::Response,
    url: &str,
    limit: u64,
) -> Result<Vec<u8>, FetchError> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_reqwest(url, e))?;
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(FetchError::too_large(url, limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
