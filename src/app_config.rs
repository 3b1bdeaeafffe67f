//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use noir_core::scope::{MAX_IO_THREADS, available_cpus};

/// Largest accepted `max_image_bytes` (1 GiB).
const MAX_IMAGE_BYTES_LIMIT: u64 = 1024 * 1024 * 1024;

/// File configuration for noir defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory.
    pub output_dir: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP total request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Largest image body accepted from the network.
    pub max_image_bytes: Option<u64>,
    /// I/O worker pool size.
    pub io_threads: Option<usize>,
    /// CPU worker pool size.
    pub cpu_threads: Option<usize>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if let Some(limit) = self.max_image_bytes
            && !(1..=MAX_IMAGE_BYTES_LIMIT).contains(&limit)
        {
            bail!(
                "Invalid config value for `max_image_bytes`: {limit}. Expected range: 1..={MAX_IMAGE_BYTES_LIMIT}"
            );
        }

        if let Some(threads) = self.io_threads
            && !(1..=MAX_IO_THREADS).contains(&threads)
        {
            bail!(
                "Invalid config value for `io_threads`: {threads}. Expected range: 1..={MAX_IO_THREADS}"
            );
        }

        let cpus = available_cpus();
        if let Some(threads) = self.cpu_threads
            && !(1..=cpus).contains(&threads)
        {
            bail!("Invalid config value for `cpu_threads`: {threads}. Expected range: 1..={cpus}");
        }

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/noir/config.toml`
/// 2. `$HOME/.config/noir/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("noir").join("config.toml"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("noir")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "max_image_bytes" => {
                cfg.max_image_bytes = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "io_threads" => {
                cfg.io_threads = Some(parse_thread_count(value).with_context(invalid)?);
            }
            "cpu_threads" => {
                cfg.cpu_threads = Some(parse_thread_count(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_thread_count(raw_value: &str) -> Result<usize> {
    let value = parse_integer_u64(raw_value)?;
    usize::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for usize"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
io_threads = 4
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.io_threads, Some(4));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
output_dir = "/tmp/gray"
verbosity = "quiet"
connect_timeout_secs = 5
read_timeout_secs = 60
max_image_bytes = 1048576
io_threads = 2
cpu_threads = 1
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/gray")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(cfg.read_timeout_secs, Some(60));
        assert_eq!(cfg.max_image_bytes, Some(1_048_576));
        assert_eq!(cfg.io_threads, Some(2));
        assert_eq!(cfg.cpu_threads, Some(1));
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config_str("concurrency = 4").expect_err("unknown key expected");
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_io_threads() {
        let err = parse_config_str("io_threads = 0").expect_err("invalid io_threads expected");
        assert!(err.to_string().contains("io_threads"));

        let err = parse_config_str("io_threads = 65").expect_err("invalid io_threads expected");
        assert!(err.to_string().contains("io_threads"));
    }

    #[test]
    fn test_parse_config_rejects_cpu_threads_over_available() {
        let too_many = format!("cpu_threads = {}", available_cpus() + 1);
        let err = parse_config_str(&too_many).expect_err("invalid cpu_threads expected");
        assert!(err.to_string().contains("cpu_threads"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_limits() {
        let err = parse_config_str("max_image_bytes = 0").expect_err("zero limit rejected");
        assert!(err.to_string().contains("max_image_bytes"));

        let err = parse_config_str("read_timeout_secs = 3601").expect_err("timeout rejected");
        assert!(err.to_string().contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("io_threads = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("io_threads"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("output_dir = /tmp/x").expect_err("quotes required");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("verbosity").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r##"
# noir defaults
io_threads = 4 # network workers
output_dir = "/tmp/#gray" # hash inside quotes is kept
"##,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.io_threads, Some(4));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/#gray")));
    }

    #[test]
    fn test_parse_config_rejects_unknown_verbosity() {
        let err = parse_config_str(r#"verbosity = "loud""#).expect_err("bad verbosity");
        assert!(err.to_string().contains("loud"));
    }
}
