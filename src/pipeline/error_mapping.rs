//! Translation of component failures into outcome codes and operator messages.
//!
//! This is the only module that knows both the component error types and the
//! exit-code taxonomy.

use std::path::Path;

use crate::outcome::OutcomeCode;
use crate::output::OutputPathError;
use crate::parser::ParseError;

/// A failed stage: the code the run ends with and the line shown after `Error: `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StageFailure {
    pub(super) code: OutcomeCode,
    pub(super) message: String,
}

impl StageFailure {
    fn new(code: OutcomeCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(super) fn invalid_url(error: &ParseError) -> Self {
        Self::new(OutcomeCode::InvalidInput, format!("Invalid URL: {error}"))
    }

    pub(super) fn output_dir(error: &OutputPathError) -> Self {
        let code = match error {
            OutputPathError::NotADirectory { .. } => OutcomeCode::InvalidInput,
            OutputPathError::Cancelled { .. } => OutcomeCode::UserCancelled,
            OutputPathError::Prompt { .. } | OutputPathError::CreateDir { .. } => {
                OutcomeCode::IoError
            }
        };
        Self::new(code, error.to_string())
    }

    pub(super) fn fetch_failed() -> Self {
        Self::new(OutcomeCode::NetworkError, "Failed to fetch image from URL")
    }

    pub(super) fn processing_failed() -> Self {
        Self::new(OutcomeCode::ProcessingError, "Failed to process image")
    }

    pub(super) fn write_failed(path: &Path, cause: &dyn std::fmt::Display) -> Self {
        Self::new(
            OutcomeCode::IoError,
            format!("Failed to save image: {}: {cause}", path.display()),
        )
    }
}
