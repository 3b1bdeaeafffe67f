//! Input parsing: turns the user-supplied image URL into a [`ResourceLocator`].

mod error;
mod url;

pub use error::{MAX_URL_LENGTH, ParseError};
pub use url::{ResourceLocator, SUPPORTED_SCHEMES, is_valid_image_url, validate_image_url};
