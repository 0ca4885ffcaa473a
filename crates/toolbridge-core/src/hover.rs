//! `textDocument/hover` through external lookup tools.

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};
use toolbridge_config::{HoverKind, ToolConfig};
use tracing::{debug, info, warn};

use crate::capability::{Capability, Resolution, resolve};
use crate::command::build;
use crate::dispatcher::Dispatcher;
use crate::document::DocumentStore;
use crate::errors::DispatchError;
use crate::runner::{CommandRunner, Invocation};
use crate::text::{protocol_offset, split_lines, to_utf16};
use crate::tokenizer::{WordSpan, word_at};

/// Tracing target for hover.
const HOVER_TARGET: &str = "toolbridge_core::hover";

impl<S: DocumentStore, R: CommandRunner> Dispatcher<S, R> {
    /// Describes the word under `position` in the document at `uri`.
    ///
    /// Only the first tool that declares a hover command is run. Unlike
    /// formatting, a failing tool ends the request with an error rather than
    /// handing over to the next candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DocumentNotFound`] or
    /// [`DispatchError::InvalidPosition`] for bad requests, and
    /// [`DispatchError::HoverFailed`] when the tool fails.
    pub fn hover(&self, uri: &str, position: Position) -> Result<Option<Hover>, DispatchError> {
        let document = self.document(uri)?;
        let invalid_position = || DispatchError::InvalidPosition {
            uri: uri.to_owned(),
            line: position.line,
            character: position.character,
        };

        let lines = split_lines(document.text());
        let line = usize::try_from(position.line)
            .ok()
            .and_then(|index| lines.get(index))
            .ok_or_else(invalid_position)?;
        let units = to_utf16(line);
        let cursor = usize::try_from(position.character)
            .ok()
            .filter(|cursor| *cursor <= units.len())
            .ok_or_else(invalid_position)?;

        let span = word_at(&units, cursor);
        let word = span.text(&units);
        let language = document.language_id();

        let candidates = match resolve(self.table(), language, Capability::Hover) {
            Resolution::Candidates(tools) => tools,
            absent @ (Resolution::NotConfigured | Resolution::Unsupported) => {
                info!(
                    target: HOVER_TARGET,
                    language,
                    capability = %Capability::Hover,
                    reason = absent.reason(),
                    "hover for language not supported"
                );
                return Ok(None);
            }
        };

        let Some(tool) = candidates.iter().find(|tool| tool.hovers()) else {
            return Ok(None);
        };

        let output = self
            .runner()
            .run(&hover_invocation(tool, &word))
            .map_err(|source| {
                warn!(target: HOVER_TARGET, language, error = %source, "hover tool failed");
                DispatchError::HoverFailed {
                    language: language.to_owned(),
                    source,
                }
            })?;

        debug!(target: HOVER_TARGET, language, word = word.as_str(), "hover succeeded");
        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: markup_kind(tool.hover_kind),
                value: String::from_utf8_lossy(&output).trim().to_owned(),
            }),
            range: Some(word_range(position.line, span)),
        }))
    }
}

/// Stdin-fed tools get the template untouched; others get the word spliced in.
fn hover_invocation(tool: &ToolConfig, word: &str) -> Invocation {
    let invocation = if tool.hover_stdin {
        Invocation::new(tool.hover_command.as_str()).with_stdin(word)
    } else {
        Invocation::new(build(&tool.hover_command, word))
    };
    invocation.with_env(&tool.env)
}

fn markup_kind(kind: HoverKind) -> MarkupKind {
    match kind {
        HoverKind::Markdown => MarkupKind::Markdown,
        HoverKind::PlainText => MarkupKind::PlainText,
    }
}

fn word_range(line: u32, span: WordSpan) -> Range {
    Range::new(
        Position::new(line, protocol_offset(span.start)),
        Position::new(line, protocol_offset(span.end)),
    )
}
