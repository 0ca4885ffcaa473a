//! YAML configuration file loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::defaults::{default_log_filter_string, default_log_format};
use crate::logging::LogFormat;
use crate::tool::{ConfigTable, EnvOverride, HoverKind, ToolConfig};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{}': {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema.
    #[error("failed to parse configuration '{origin}': {message}")]
    Parse {
        /// File path, or `<inline>` for in-memory sources.
        origin: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An `env` entry is not of the form `KEY=VALUE`.
    #[error("invalid env entry '{entry}' for language '{language}', expected KEY=VALUE")]
    InvalidEnvironment {
        /// Language whose tool list contains the entry.
        language: String,
        /// Offending entry.
        entry: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    languages: BTreeMap<String, Vec<RawTool>>,
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawTool {
    #[serde(default)]
    format_command: String,
    #[serde(default)]
    hover_command: String,
    #[serde(default)]
    hover_stdin: bool,
    #[serde(default)]
    hover_type: HoverKind,
    #[serde(default)]
    env: Vec<String>,
}

impl RawTool {
    fn into_tool(self, language: &str) -> Result<ToolConfig, ConfigError> {
        let env = self
            .env
            .into_iter()
            .map(|entry| {
                EnvOverride::parse(&entry).ok_or_else(|| ConfigError::InvalidEnvironment {
                    language: language.to_owned(),
                    entry,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ToolConfig {
            format_command: self.format_command,
            hover_command: self.hover_command,
            hover_stdin: self.hover_stdin,
            hover_kind: self.hover_type,
            env,
        })
    }
}

/// Fully loaded runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    languages: ConfigTable,
    log_filter: String,
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: ConfigTable::default(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text cannot be parsed or validated.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Self::parse(source, "<inline>")
    }

    fn parse(source: &str, origin: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, empty configuration.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig =
            serde_saphyr::from_str(source).map_err(|error| ConfigError::Parse {
                origin: origin.to_owned(),
                message: error.to_string(),
            })?;

        let mut languages = ConfigTable::new();
        for (language, tools) in raw.languages {
            let resolved = tools
                .into_iter()
                .map(|tool| tool.into_tool(&language))
                .collect::<Result<Vec<_>, _>>()?;
            languages.insert(language, resolved);
        }

        Ok(Self {
            languages,
            log_filter: raw.log_filter,
            log_format: raw.log_format,
        })
    }

    /// Per-language tool table.
    #[must_use]
    pub const fn languages(&self) -> &ConfigTable {
        &self.languages
    }

    /// Consumes the configuration, returning the tool table.
    #[must_use]
    pub fn into_languages(self) -> ConfigTable {
        self.languages
    }

    /// Log filter expression understood by `tracing-subscriber`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Replaces the tool table.
    #[must_use]
    pub fn with_languages(mut self, languages: ConfigTable) -> Self {
        self.languages = languages;
        self
    }

    /// Overrides the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log format.
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}
