use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use noir_core::{FetchSettings, PipelineRequest, PoolSizes};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

/// Which flags the operator actually typed, as opposed to clap defaults.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

/// Everything a run needs, after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) request: PipelineRequest,
    pub(crate) quiet: bool,
    pub(crate) verbose: u8,
    pub(crate) fetch: FetchSettings,
    pub(crate) pools: PoolSizes,
}

pub(crate) fn parse_cli_with_sources<I, T>(argv: I) -> Result<(Args, CliValueSources), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Args::command().try_get_matches_from(argv)?;
    let args = Args::from_arg_matches(&matches)?;

    let sources = CliValueSources {
        output_dir: is_commandline_value(&matches, "output_dir"),
        verbose: is_commandline_value(&matches, "verbose"),
        quiet: is_commandline_value(&matches, "quiet"),
    };
    Ok((args, sources))
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

pub(crate) fn resolve_settings(
    args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> RunSettings {
    let mut quiet = args.quiet;
    let mut verbose = args.verbose;
    let mut output_dir = args.output_dir;
    let mut fetch = FetchSettings::default();
    let mut pools = PoolSizes::default();

    if let Some(file_config) = file_config {
        if !cli_sources.output_dir
            && let Some(dir) = &file_config.output_dir
        {
            output_dir = Some(dir.clone());
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            (quiet, verbose) = config_verbosity(verbosity);
        }

        if let Some(secs) = file_config.connect_timeout_secs {
            fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file_config.read_timeout_secs {
            fetch.read_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = file_config.max_image_bytes {
            fetch.max_image_bytes = limit;
        }
        if let Some(threads) = file_config.io_threads {
            pools.io_threads = threads;
        }
        if let Some(threads) = file_config.cpu_threads {
            pools.cpu_threads = threads;
        }
    }

    let mut request = PipelineRequest::new(
        args.image_url,
        output_dir.unwrap_or_else(|| PathBuf::from(".")),
    );
    request.output_filename = args.output;

    RunSettings {
        request,
        quiet,
        verbose,
        fetch,
        pools,
    }
}

fn config_verbosity(verbosity: VerbositySetting) -> (bool, u8) {
    match verbosity {
        VerbositySetting::Default => (false, 0),
        VerbositySetting::Verbose => (false, 1),
        VerbositySetting::Quiet => (true, 0),
        VerbositySetting::Debug => (false, 2),
    }
}

/// Log level used when `RUST_LOG` is unset. Logging stays off unless asked for.
pub(crate) fn resolve_default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "off",
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/a.jpg";

    fn parse(argv: &[&str]) -> (Args, CliValueSources) {
        parse_cli_with_sources(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_sources_track_explicit_flags_only() {
        let (_, sources) = parse(&["noir", URL]);
        assert!(!sources.output_dir && !sources.verbose && !sources.quiet);

        let (_, sources) = parse(&["noir", URL, "-d", "out", "-v", "-q"]);
        assert!(sources.output_dir && sources.verbose && sources.quiet);
    }

    #[test]
    fn test_resolve_settings_defaults_without_config() {
        let (args, sources) = parse(&["noir", URL, "-o", "gray"]);
        let settings = resolve_settings(args, &sources, None);

        assert_eq!(settings.request.image_url, URL);
        assert_eq!(settings.request.output_dir, PathBuf::from("."));
        assert_eq!(settings.request.output_filename.as_deref(), Some("gray"));
        assert!(!settings.quiet);
        assert_eq!(settings.verbose, 0);
        assert_eq!(settings.fetch, FetchSettings::default());
        assert_eq!(settings.pools, PoolSizes::default());
    }

    #[test]
    fn test_config_fills_values_not_given_on_command_line() {
        let config = FileConfig {
            output_dir: Some(PathBuf::from("/srv/gray")),
            verbosity: Some(VerbositySetting::Quiet),
            connect_timeout_secs: Some(5),
            read_timeout_secs: Some(20),
            max_image_bytes: Some(1024),
            io_threads: Some(3),
            cpu_threads: Some(1),
        };
        let (args, sources) = parse(&["noir", URL]);
        let settings = resolve_settings(args, &sources, Some(&config));

        assert_eq!(settings.request.output_dir, PathBuf::from("/srv/gray"));
        assert!(settings.quiet);
        assert_eq!(settings.fetch.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.fetch.read_timeout, Duration::from_secs(20));
        assert_eq!(settings.fetch.max_image_bytes, 1024);
        assert_eq!(settings.pools.io_threads, 3);
        assert_eq!(settings.pools.cpu_threads, 1);
    }

    #[test]
    fn test_command_line_wins_over_config() {
        let config = FileConfig {
            output_dir: Some(PathBuf::from("/srv/gray")),
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let (args, sources) = parse(&["noir", URL, "-d", "here", "-v"]);
        let settings = resolve_settings(args, &sources, Some(&config));

        assert_eq!(settings.request.output_dir, PathBuf::from("here"));
        assert!(!settings.quiet);
        assert_eq!(settings.verbose, 1);
    }

    #[test]
    fn test_config_debug_verbosity_maps_to_trace() {
        let config = FileConfig {
            verbosity: Some(VerbositySetting::Debug),
            ..FileConfig::default()
        };
        let (args, sources) = parse(&["noir", URL]);
        let settings = resolve_settings(args, &sources, Some(&config));
        assert_eq!(resolve_default_log_level(settings.verbose), "trace");
    }

    #[test]
    fn test_default_log_level_is_off_until_verbose() {
        assert_eq!(resolve_default_log_level(0), "off");
        assert_eq!(resolve_default_log_level(1), "debug");
        assert_eq!(resolve_default_log_level(2), "trace");
        assert_eq!(resolve_default_log_level(9), "trace");
    }
}
