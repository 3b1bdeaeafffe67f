//! Transform stage: convert fetched bytes into the saved image.
//!
//! The pipeline only sees the [`Transformer`] trait. [`GrayscaleTransformer`]
//! decodes any supported input format and always encodes PNG.

mod error;
mod grayscale;

use crate::payload::Payload;

pub use error::TransformError;
pub use grayscale::GrayscaleTransformer;

/// CPU-bound conversion from one payload to another.
///
/// Implementations run on the CPU worker pool and may block for as long as
/// the conversion takes.
pub trait Transformer: Send + Sync {
    /// Converts `input` into the output payload.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] when the input cannot be decoded or the
    /// output cannot be encoded.
    fn transform(&self, input: Payload) -> Result<Payload, TransformError>;
}
