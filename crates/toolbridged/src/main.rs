//! Entry point for the `toolbridge` language server.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use toolbridged::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match toolbridged::run(&cli) {
        Ok(end) => end.exit_code(),
        Err(error) => {
            // Telemetry may not be installed yet. A failed write leaves
            // nowhere else to report to.
            writeln!(io::stderr(), "toolbridge: {error}").unwrap_or_default();
            ExitCode::FAILURE
        }
    }
}
