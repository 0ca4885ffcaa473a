//! Capability modelling and per-language candidate resolution.

use std::fmt;

use toolbridge_config::{ConfigTable, ToolConfig};

/// Feature a configured tool may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `textDocument/formatting`.
    Format,
    /// `textDocument/hover`.
    Hover,
}

impl Capability {
    /// Returns the command template the tool declares for this capability.
    #[must_use]
    pub fn command(self, tool: &ToolConfig) -> &str {
        match self {
            Self::Format => tool.format_command.as_str(),
            Self::Hover => tool.hover_command.as_str(),
        }
    }

    /// Whether `tool` declares a command for this capability.
    #[must_use]
    pub fn provided_by(self, tool: &ToolConfig) -> bool {
        !self.command(tool).is_empty()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Format => "format",
            Self::Hover => "hover",
        };
        formatter.write_str(label)
    }
}

/// Outcome of resolving a language against the configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Neither the language nor the wildcard has any tools.
    NotConfigured,
    /// Tools exist for the language but none declares the capability.
    Unsupported,
    /// Candidates in priority order, at least one of which declares the
    /// capability. The list is not filtered.
    Candidates(&'a [ToolConfig]),
}

impl Resolution<'_> {
    /// Short description of the outcome, used as a log field.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotConfigured => "language not configured",
            Self::Unsupported => "capability not supported",
            Self::Candidates(_) => "candidates available",
        }
    }
}

/// Resolves the candidate tools for `language_id`.
///
/// The wildcard entry is used only when the language has no entry of its
/// own; a language entry that lacks the capability does not fall back.
#[must_use]
pub fn resolve<'a>(
    table: &'a ConfigTable,
    language_id: &str,
    capability: Capability,
) -> Resolution<'a> {
    match table.lookup(language_id) {
        None => Resolution::NotConfigured,
        Some(tools) if tools.iter().any(|tool| capability.provided_by(tool)) => {
            Resolution::Candidates(tools)
        }
        Some(_) => Resolution::Unsupported,
    }
}
