//! Configuration shared by the toolbridge crates.
//!
//! A configuration file maps language identifiers to ordered lists of
//! external tools. Each tool may provide a formatting command, a hover
//! command, or both, plus environment overrides for the spawned process.
//! The reserved `_` language applies to any language without its own entry.
//!
//! ```yaml
//! log-filter: info
//! languages:
//!   go:
//!     - format-command: gofmt
//!   _:
//!     - hover-command: dict ${INPUT}
//!       hover-type: markdown
//!       env: [LANG=C]
//! ```

mod defaults;
mod file;
mod logging;
mod tool;

pub use defaults::{
    DEFAULT_LOG_FILTER, INPUT_PLACEHOLDER, WILDCARD_LANGUAGE, default_config_path,
    default_log_filter_string, default_log_format,
};
pub use file::{Config, ConfigError};
pub use logging::{LogFormat, LogFormatParseError};
pub use tool::{ConfigTable, EnvOverride, HoverKind, ToolConfig};
