//! Error types for the transform stage.

use thiserror::Error;

/// Errors that can occur while converting an image.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input bytes are not an image in a supported format.
    #[error("cannot decode image ({input_bytes} bytes): {source}")]
    Decode {
        /// Size of the rejected input.
        input_bytes: usize,
        /// The underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Encoding the converted image failed.
    #[error("cannot encode converted image: {source}")]
    Encode {
        /// The underlying codec error.
        #[source]
        source: image::ImageError,
    },
}
