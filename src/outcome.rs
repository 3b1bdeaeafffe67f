//! Terminal outcomes of a single invocation and their process exit codes.
//!
//! The numeric values are part of the scripting contract and must not change.

use std::fmt;
use std::process::ExitCode;

/// The finite set of reasons a run can terminate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCode {
    /// The image was fetched, converted and saved.
    Success,
    /// Anything not covered by a more specific code.
    GeneralError,
    /// Bad URL, bad arguments, or an output path that is not a directory.
    InvalidInput,
    /// The fetch stage failed.
    NetworkError,
    /// The transform stage failed.
    ProcessingError,
    /// Creating the output directory or writing the result failed.
    IoError,
    /// The operator declined to create the output directory.
    UserCancelled,
}

impl OutcomeCode {
    /// Every code in exit-code order.
    pub const ALL: [Self; 7] = [
        Self::Success,
        Self::GeneralError,
        Self::InvalidInput,
        Self::NetworkError,
        Self::ProcessingError,
        Self::IoError,
        Self::UserCancelled,
    ];

    /// Returns the process exit status for this outcome.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::GeneralError => 1,
            Self::InvalidInput => 2,
            Self::NetworkError => 3,
            Self::ProcessingError => 4,
            Self::IoError => 5,
            Self::UserCancelled => 6,
        }
    }

    /// Returns true only for [`OutcomeCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Short description used in the `--help` footer.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::GeneralError => "General error",
            Self::InvalidInput => "Invalid input (bad URL or arguments)",
            Self::NetworkError => "Network error (failed to fetch image)",
            Self::ProcessingError => "Processing error (failed to convert image)",
            Self::IoError => "I/O error (failed to save output)",
            Self::UserCancelled => "User cancelled",
        }
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

impl From<OutcomeCode> for ExitCode {
    fn from(outcome: OutcomeCode) -> Self {
        ExitCode::from(outcome.code())
    }
}
