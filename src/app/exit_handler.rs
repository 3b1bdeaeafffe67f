//! Exit code logic for the noir process.
//!
//! Single responsibility: turn argument errors and uncaught failures into an
//! [`OutcomeCode`], printing what the operator needs to see.

use clap::error::ErrorKind;
use noir_core::OutcomeCode;
use tracing::error;

/// Outcome for a clap parse result that stopped the run.
pub(crate) fn cli_error_outcome(kind: ErrorKind) -> OutcomeCode {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => OutcomeCode::Success,
        _ => OutcomeCode::InvalidInput,
    }
}

/// Renders a clap usage error as `Error: <message>` followed by usage.
pub(crate) fn render_cli_error(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let body = rendered.strip_prefix("error: ").unwrap_or(&rendered);
    format!("Error: {body}")
}

/// Prints help/version to stdout or a usage error to stderr and maps the exit.
pub(crate) fn report_cli_error(err: &clap::Error) -> OutcomeCode {
    let outcome = cli_error_outcome(err.kind());
    if outcome.is_success() {
        let _ = err.print();
    } else {
        eprint!("{}", render_cli_error(err));
    }
    outcome
}

/// Prints an error that escaped the pipeline and maps it to a general error.
pub(crate) fn report_uncaught(err: &anyhow::Error) -> OutcomeCode {
    error!(error = %format!("{err:#}"), "run aborted");
    eprintln!("Error: {err:#}");
    OutcomeCode::GeneralError
}
