use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use noir_core::{
    Console, GrayscaleTransformer, HttpFetcher, OutcomeCode, Pipeline, ProgressRunner,
    WorkerPools,
};
use tracing::{debug, info};

use crate::app::config_runtime::{self, CliValueSources};
use crate::app::{exit_handler, terminal};
use crate::app_config;
use crate::cli::Args;

pub(crate) fn run_noir() -> OutcomeCode {
    let (args, cli_sources) = match config_runtime::parse_cli_with_sources(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => return exit_handler::report_cli_error(&err),
    };

    match run_with_args(args, &cli_sources) {
        Ok(outcome) => outcome,
        Err(err) => exit_handler::report_uncaught(&err),
    }
}

fn run_with_args(args: Args, cli_sources: &CliValueSources) -> Result<OutcomeCode> {
    let loaded = app_config::load_default_file_config()?;
    let settings = config_runtime::resolve_settings(args, cli_sources, loaded.config.as_ref());

    terminal::init_tracing(
        config_runtime::resolve_default_log_level(settings.verbose),
        terminal::is_no_color_requested(),
    );
    debug!(
        config_path = ?loaded.path,
        from_file = loaded.config.is_some(),
        "configuration resolved"
    );
    debug!(?settings, "CLI arguments parsed");

    let pools = WorkerPools::new(settings.pools).context("Failed to start worker pools")?;
    let fetcher = HttpFetcher::new(settings.fetch).context("Failed to build HTTP client")?;
    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        Arc::new(GrayscaleTransformer::new()),
        pools.io(),
        pools.cpu(),
        ProgressRunner::new(Console::stdio(settings.quiet)),
    );

    // The orchestrator only sequences stages; the work itself runs on the pools.
    let orchestrator = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start orchestrator runtime")?;

    let request = settings.request;
    let joined = orchestrator
        .block_on(async move { tokio::spawn(async move { pipeline.run(&request).await }).await });

    let run = joined.map_err(|join_error| anyhow!("pipeline task aborted: {join_error}"))?;
    info!(outcome = %run.outcome(), stages = run.stages_entered().len(), "noir finished");
    Ok(run.outcome())
}
