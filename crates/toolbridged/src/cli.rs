//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use toolbridge_config::{Config, ConfigError, LogFormat, default_config_path};

/// Language server that answers formatting and hover requests by running
/// configured command-line tools.
#[derive(Debug, Clone, Parser)]
#[command(name = "toolbridge", version, about)]
pub struct Cli {
    /// Configuration file; defaults to `<config dir>/toolbridge/config.yaml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter directive, overriding the configuration file.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Log output format, overriding the configuration file.
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse()
        .map_err(|_| format!("unsupported log format '{input}', expected json or compact"))
}

impl Cli {
    /// Loads the configuration this invocation asks for.
    ///
    /// An explicit `--config` must exist. The default location is optional:
    /// when it is absent the server starts with no tools configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let loaded = match (&self.config, default_config_path()) {
            (Some(path), _) => Config::load_from_path(path)?,
            (None, Some(path)) if path.is_file() => Config::load_from_path(&path)?,
            (None, _) => Config::default(),
        };
        Ok(self.apply_overrides(loaded))
    }

    fn apply_overrides(&self, config: Config) -> Config {
        let with_filter = match &self.log_filter {
            Some(filter) => config.with_log_filter(filter.as_str()),
            None => config,
        };
        match self.log_format {
            Some(format) => with_filter.with_log_format(format),
            None => with_filter,
        }
    }
}
