//! Output location handling: the directory a result is saved into and the
//! name it is saved under.
//!
//! Both steps are synchronous. Directory resolution may ask the operator for
//! confirmation before creating anything; it is the only point in a run that
//! reads standard input.

mod directory;
mod error;
mod filename;

pub use directory::{DirectoryStatus, ensure_output_dir, is_affirmative};
pub use error::OutputPathError;
pub use filename::{GENERATED_PREFIX, OUTPUT_EXTENSION, generate_output_filename};
