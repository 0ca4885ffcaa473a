use std::path::PathBuf;

/// Reserved language key applied to documents whose language has no entry.
pub const WILDCARD_LANGUAGE: &str = "_";

/// Placeholder substituted into command templates.
pub const INPUT_PLACEHOLDER: &str = "${INPUT}";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Location of the configuration file when none is given on the command line.
///
/// Returns `None` on platforms without a per-user configuration directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut dir| {
        dir.push("toolbridge");
        dir.push("config.yaml");
        dir
    })
}
