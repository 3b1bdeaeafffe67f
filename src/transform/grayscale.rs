//! Grayscale conversion with PNG output.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::{debug, instrument};

use super::Transformer;
use super::error::TransformError;
use crate::payload::Payload;

/// Decodes JPEG, PNG, GIF, BMP or WebP, converts to 8-bit luma and encodes PNG.
///
/// Alpha is dropped; the output is always single-channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleTransformer;

impl GrayscaleTransformer {
    /// Creates the transformer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for GrayscaleTransformer {
    #[instrument(level = "debug", skip(self, input), fields(input_bytes = input.len()))]
    fn transform(&self, input: Payload) -> Result<Payload, TransformError> {
        let decoded =
            image::load_from_memory(input.as_bytes()).map_err(|source| TransformError::Decode {
                input_bytes: input.len(),
                source,
            })?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            "image decoded"
        );

        let gray = decoded.to_luma8();
        drop(decoded);

        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(
                gray.as_raw(),
                gray.width(),
                gray.height(),
                ExtendedColorType::L8,
            )
            .map_err(|source| TransformError::Encode { source })?;

        debug!(output_bytes = out.len(), "image converted to grayscale");
        Ok(Payload::new(out))
    }
}
