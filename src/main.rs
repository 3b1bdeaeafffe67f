//! CLI entry point for the noir tool.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;

fn main() -> ExitCode {
    app::runtime::run_noir().into()
}
