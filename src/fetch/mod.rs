//! Fetch stage: retrieve the raw image bytes for a [`ResourceLocator`].
//!
//! The pipeline only sees the [`Fetcher`] trait. [`HttpFetcher`] is the
//! default implementation; tests and other protocols plug in their own.
//!
//! A successful fetch means "bytes received", not "bytes are a valid image".
//! An empty or garbled body passes here and fails in the transform stage.

mod client;
mod constants;
mod error;

use async_trait::async_trait;

use crate::parser::ResourceLocator;
use crate::payload::Payload;

pub use client::{FetchSettings, HttpFetcher};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_MAX_IMAGE_BYTES, READ_TIMEOUT_SECS};
pub use error::FetchError;

/// Retrieves the bytes behind a locator.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the full body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the body cannot be retrieved.
    async fn fetch(&self, locator: &ResourceLocator) -> Result<Payload, FetchError>;
}
