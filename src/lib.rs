//! Noir Core Library
//!
//! Fetches an image over HTTP, converts it to grayscale and saves it as PNG,
//! showing a progress ticker while each stage runs on its worker pool.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Image URL validation
//! - [`output`] - Output directory resolution and filename generation
//! - [`scope`] - The I/O and CPU worker pools
//! - [`progress`] - Running a stage on a pool behind a progress ticker
//! - [`fetch`] - Retrieving the image bytes
//! - [`transform`] - Grayscale conversion
//! - [`pipeline`] - The stage state machine tying it together
//! - [`outcome`] - Process outcome codes

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod fetch;
pub mod outcome;
pub mod output;
pub mod parser;
pub mod payload;
pub mod pipeline;
pub mod progress;
pub mod scope;
pub mod transform;
mod user_agent;

// Re-export commonly used types
pub use console::Console;
pub use fetch::{FetchError, FetchSettings, Fetcher, HttpFetcher};
pub use outcome::OutcomeCode;
pub use output::{DirectoryStatus, OutputPathError, ensure_output_dir, generate_output_filename};
pub use parser::{ParseError, ResourceLocator, is_valid_image_url, validate_image_url};
pub use payload::Payload;
pub use pipeline::{Pipeline, PipelineRequest, PipelineRun, SavedImage, Stage};
pub use progress::ProgressRunner;
pub use scope::{PoolSizes, Scope, ScopeError, WorkerPools};
pub use transform::{GrayscaleTransformer, TransformError, Transformer};
