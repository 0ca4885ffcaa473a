//! Per-language tool definitions and the table that holds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::WILDCARD_LANGUAGE;

/// Markup kind produced by a hover tool.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HoverKind {
    /// Output is shown verbatim.
    #[default]
    #[serde(alias = "plaintext")]
    #[strum(serialize = "plain_text", serialize = "plaintext")]
    PlainText,
    /// Output is rendered as Markdown.
    Markdown,
}

/// A single `KEY=VALUE` environment override applied to a tool process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    key: String,
    value: String,
}

impl EnvOverride {
    /// Builds an override from its parts.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parses a `KEY=VALUE` entry. The key must be non-empty; the value may be.
    #[must_use]
    pub fn parse(entry: &str) -> Option<Self> {
        let (key, value) = entry.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value))
    }

    /// Variable name.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Variable value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// One external tool configured for a language.
///
/// Empty command strings mean the tool does not provide that capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolConfig {
    /// Template run to format a document.
    pub format_command: String,
    /// Template run to describe the word under the cursor.
    pub hover_command: String,
    /// Feed the hovered word through stdin instead of the command line.
    pub hover_stdin: bool,
    /// How hover output should be rendered.
    pub hover_kind: HoverKind,
    /// Environment overrides, applied in order after the inherited environment.
    pub env: Vec<EnvOverride>,
}

impl ToolConfig {
    /// Sets the formatting template.
    #[must_use]
    pub fn with_format_command(mut self, command: impl Into<String>) -> Self {
        self.format_command = command.into();
        self
    }

    /// Sets the hover template.
    #[must_use]
    pub fn with_hover_command(mut self, command: impl Into<String>) -> Self {
        self.hover_command = command.into();
        self
    }

    /// Delivers the hovered word through stdin.
    #[must_use]
    pub fn with_hover_stdin(mut self, enabled: bool) -> Self {
        self.hover_stdin = enabled;
        self
    }

    /// Sets the hover markup kind.
    #[must_use]
    pub fn with_hover_kind(mut self, kind: HoverKind) -> Self {
        self.hover_kind = kind;
        self
    }

    /// Appends an environment override.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push(EnvOverride::new(key, value));
        self
    }

    /// Whether this tool can format documents.
    #[must_use]
    pub fn formats(&self) -> bool {
        !self.format_command.is_empty()
    }

    /// Whether this tool can answer hover requests.
    #[must_use]
    pub fn hovers(&self) -> bool {
        !self.hover_command.is_empty()
    }
}

/// Ordered tool lists keyed by language identifier.
///
/// The reserved [`WILDCARD_LANGUAGE`] key covers every language that has no
/// entry of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTable {
    languages: BTreeMap<String, Vec<ToolConfig>>,
}

impl ConfigTable {
    /// Builds an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tool list for `language`.
    pub fn insert(&mut self, language: impl Into<String>, tools: Vec<ToolConfig>) {
        self.languages.insert(language.into(), tools);
    }

    /// Builder form of [`ConfigTable::insert`].
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>, tools: Vec<ToolConfig>) -> Self {
        self.insert(language, tools);
        self
    }

    /// Returns the candidates for `language_id` in priority order.
    ///
    /// The wildcard entry is consulted only when `language_id` has no entry at
    /// all. An entry with no tools resolves to `None`.
    #[must_use]
    pub fn lookup(&self, language_id: &str) -> Option<&[ToolConfig]> {
        self.languages
            .get(language_id)
            .or_else(|| self.languages.get(WILDCARD_LANGUAGE))
            .map(Vec::as_slice)
            .filter(|tools| !tools.is_empty())
    }

    /// Iterates over every configured tool regardless of language.
    pub fn tools(&self) -> impl Iterator<Item = &ToolConfig> {
        self.languages.values().flatten()
    }

    /// Number of language entries, counting the wildcard.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether no language is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
