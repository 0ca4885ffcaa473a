//! `textDocument/formatting` through external formatters.

use lsp_types::{Position, Range, TextEdit};
use tracing::{debug, info};
use url::Url;

use crate::capability::{Capability, Resolution, resolve};
use crate::command::build;
use crate::dispatcher::Dispatcher;
use crate::document::DocumentStore;
use crate::errors::DispatchError;
use crate::runner::{CommandRunner, Invocation};
use crate::text::{protocol_offset, split_lines, utf16_len};

/// Tracing target for formatting.
const FORMAT_TARGET: &str = "toolbridge_core::format";

impl<S: DocumentStore, R: CommandRunner> Dispatcher<S, R> {
    /// Formats the document at `uri`.
    ///
    /// Formatters are tried in priority order with the document text on
    /// stdin and its path substituted into the command; the first one that
    /// exits successfully wins. The result is either empty (no formatter is
    /// configured) or a single edit replacing the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DocumentNotFound`] or
    /// [`DispatchError::InvalidUri`] for bad requests, and
    /// [`DispatchError::NoFormatterOutput`] when every formatter fails.
    pub fn format(&self, uri: &str) -> Result<Vec<TextEdit>, DispatchError> {
        let document = self.document(uri)?;
        let path = document_path(uri)?;
        let language = document.language_id();

        let candidates = match resolve(self.table(), language, Capability::Format) {
            Resolution::Candidates(tools) => tools,
            absent @ (Resolution::NotConfigured | Resolution::Unsupported) => {
                info!(
                    target: FORMAT_TARGET,
                    language,
                    capability = %Capability::Format,
                    reason = absent.reason(),
                    "format for language not supported"
                );
                return Ok(Vec::new());
            }
        };

        let output = candidates
            .iter()
            .filter(|tool| tool.formats())
            .find_map(|tool| {
                let invocation = Invocation::new(build(&tool.format_command, &path))
                    .with_env(&tool.env)
                    .with_stdin(document.text());
                match self.runner().run(&invocation) {
                    Ok(output) => Some(output),
                    Err(error) => {
                        debug!(
                            target: FORMAT_TARGET,
                            language,
                            %error,
                            "formatter failed, trying next candidate"
                        );
                        None
                    }
                }
            })
            .ok_or_else(|| DispatchError::NoFormatterOutput {
                language: language.to_owned(),
            })?;

        debug!(target: FORMAT_TARGET, language, uri, "format succeeded");
        let formatted = String::from_utf8_lossy(&output).replace('\r', "");
        Ok(vec![TextEdit::new(whole_document(document.text()), formatted)])
    }
}

/// Range from the start of `text` to the end of its last line.
fn whole_document(text: &str) -> Range {
    let lines = split_lines(text);
    let last_line = lines.len().saturating_sub(1);
    let last_width = lines.last().map_or(0, |line| utf16_len(line));
    Range::new(
        Position::new(0, 0),
        Position::new(protocol_offset(last_line), protocol_offset(last_width)),
    )
}

/// File-system path substituted into formatter commands.
///
/// Windows paths use forward slashes and are lower-cased because the file
/// system there is case-insensitive.
fn document_path(uri: &str) -> Result<String, DispatchError> {
    let path = Url::parse(uri)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| DispatchError::InvalidUri {
            uri: uri.to_owned(),
        })?;
    let display = path.to_string_lossy();
    if cfg!(windows) {
        Ok(display.replace('\\', "/").to_lowercase())
    } else {
        Ok(display.into_owned())
    }
}
