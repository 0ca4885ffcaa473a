//! Error types for the server process.

use thiserror::Error;

use toolbridge_config::ConfigError;

use crate::telemetry::TelemetryError;
use crate::transport::TransportError;

/// Failures that end the message loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading or writing a framed message failed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A response could not be serialised.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced while starting or running the server.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The session ended abnormally.
    #[error("language server session failed: {source}")]
    Session {
        /// Underlying server error.
        #[source]
        source: ServerError,
    },
}
