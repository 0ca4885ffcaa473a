//! Error types surfaced by the dispatch engine.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Failures while running an external tool.
///
/// I/O errors are wrapped in `Arc` so the error stays cheap to clone into
/// logs and responses.
#[derive(Debug, Clone, Error)]
pub enum RunError {
    /// The shell could not be started.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        /// Command line that was being run.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Piping input to or output from the process failed.
    #[error("I/O error while running '{command}': {source}")]
    Io {
        /// Command line that was being run.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The process finished unsuccessfully.
    #[error("'{command}' exited with {}: {}", describe_status(.status), .output.trim())]
    NonZeroExit {
        /// Command line that was run.
        command: String,
        /// Exit code, absent when the process was killed by a signal.
        status: Option<i32>,
        /// Combined stdout and stderr, decoded lossily.
        output: String,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    status.map_or_else(|| String::from("no exit code"), |code| format!("status {code}"))
}

impl RunError {
    pub(crate) fn spawn(command: &str, source: io::Error) -> Self {
        Self::Spawn {
            command: command.to_owned(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn io(command: &str, source: io::Error) -> Self {
        Self::Io {
            command: command.to_owned(),
            source: Arc::new(source),
        }
    }
}

/// Errors returned by [`crate::Dispatcher`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The document is not open in the store.
    #[error("document not found: {uri}")]
    DocumentNotFound {
        /// Requested document.
        uri: String,
    },

    /// The document URI does not name a local file.
    #[error("invalid uri: {uri}")]
    InvalidUri {
        /// Requested document.
        uri: String,
    },

    /// The position lies outside the document.
    #[error("invalid position {line}:{character} in {uri}")]
    InvalidPosition {
        /// Requested document.
        uri: String,
        /// Zero-based line.
        line: u32,
        /// Zero-based UTF-16 offset.
        character: u32,
    },

    /// Every configured formatter failed.
    #[error("no formatter produced output for language '{language}'")]
    NoFormatterOutput {
        /// Language of the document.
        language: String,
    },

    /// The hover tool failed.
    #[error("hover for language '{language}' failed: {source}")]
    HoverFailed {
        /// Language of the document.
        language: String,
        /// Underlying tool failure.
        #[source]
        source: RunError,
    },
}

impl DispatchError {
    /// Whether the request itself was invalid, as opposed to a tool failing.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. } | Self::InvalidUri { .. } | Self::InvalidPosition { .. }
        )
    }
}
