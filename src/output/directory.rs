//! Output directory resolution with operator confirmation.

use std::fs;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info, instrument};

use super::error::OutputPathError;
use crate::console::Console;

/// How the output directory came to be available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// The directory already existed.
    Existing,
    /// The directory was created after the operator confirmed.
    Created,
}

/// Makes sure `dir` exists as a directory, asking before creating it.
///
/// When `dir` is missing, the question is written through `console` and one
/// line is read from `input`. Only `yes` or `y` (any case) creates the
/// directory, parents included.
///
/// # Errors
///
/// - [`OutputPathError::NotADirectory`] when `dir` exists but is not a directory
/// - [`OutputPathError::Cancelled`] when the answer is empty or not affirmative
/// - [`OutputPathError::Prompt`] when the answer cannot be read
/// - [`OutputPathError::CreateDir`] when creation fails
#[instrument(level = "debug", skip(input, console), fields(dir = %dir.display()))]
pub fn ensure_output_dir(
    dir: &Path,
    input: &mut dyn BufRead,
    console: &Console,
) -> Result<DirectoryStatus, OutputPathError> {
    if dir.is_dir() {
        debug!("output directory exists");
        return Ok(DirectoryStatus::Existing);
    }
    if dir.exists() {
        return Err(OutputPathError::not_a_directory(dir));
    }

    console.prompt(&format!(
        "Directory '{}' does not exist. Would you like to create it? (yes/no): ",
        dir.display()
    ));

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| OutputPathError::prompt(dir, e))?;

    if !is_affirmative(&answer) {
        debug!(answer = answer.trim(), "directory creation declined");
        return Err(OutputPathError::cancelled(dir));
    }

    fs::create_dir_all(dir).map_err(|e| OutputPathError::create_dir(dir, e))?;

    let shown = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    info!(dir = %shown.display(), "created output directory");
    console.status_line(&format!("Directory created: {}", shown.display()));
    Ok(DirectoryStatus::Created)
}

/// Returns true for `yes` / `y` in any case, ignoring surrounding whitespace.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y")
}
