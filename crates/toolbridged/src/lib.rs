//! Language server process for toolbridge.
//!
//! The server speaks the Language Server Protocol over standard input and
//! output. It tracks open documents from text synchronisation notifications
//! and answers `textDocument/formatting` and `textDocument/hover` by running
//! the command-line tools configured for each document's language through
//! [`toolbridge_core::Dispatcher`].
//!
//! Startup follows a fixed sequence: parse the command line, load the YAML
//! configuration, install structured telemetry on standard error, then serve
//! one session until the client sends `exit` or closes the stream.

pub mod cli;
mod errors;
pub mod jsonrpc;
mod server;
mod store;
mod telemetry;
pub mod transport;

use std::io;

use toolbridge_core::{ProcessEnvironment, ShellRunner};
use tracing::info;

pub use cli::Cli;
pub use errors::{LaunchError, ServerError};
pub use server::{Server, SessionEnd};
pub use store::MemoryDocumentStore;
pub use telemetry::{TelemetryError, TelemetryHandle};

/// Tracing target for process lifecycle events.
const PROCESS_TARGET: &str = "toolbridged::process";

/// Runs the server on the process's standard streams.
///
/// # Errors
///
/// Returns [`LaunchError`] when configuration or telemetry cannot be set up,
/// or when the session fails at the transport level.
pub fn run(cli: &Cli) -> Result<SessionEnd, LaunchError> {
    let config = cli
        .load_config()
        .map_err(|source| LaunchError::Configuration { source })?;
    telemetry::initialise(&config).map_err(|source| LaunchError::Telemetry { source })?;

    let languages = config.into_languages();
    info!(
        target: PROCESS_TARGET,
        languages = languages.len(),
        "starting language server"
    );

    let server = Server::new(languages, ShellRunner::new(ProcessEnvironment::capture()));
    let end = server
        .serve(io::stdin().lock(), io::stdout())
        .map_err(|source| LaunchError::Session { source })?;
    info!(target: PROCESS_TARGET, ?end, "language server stopped");
    Ok(end)
}

#[cfg(test)]
mod tests;
