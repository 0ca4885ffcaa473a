//! Shell execution of configured tool commands.
//!
//! [`ShellRunner`] implements [`CommandRunner`] by handing the command line to
//! the platform shell (`cmd /c` on Windows, `sh -c` elsewhere). Standard
//! output and standard error share one pipe so the captured payload keeps
//! the order in which the tool wrote it. There is no timeout: a tool that
//! never exits blocks the calling request.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::{ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use toolbridge_config::EnvOverride;
use tracing::debug;

use crate::errors::RunError;

/// Tracing target for subprocess operations.
const RUNNER_TARGET: &str = "toolbridge_core::runner";

/// A fully built command ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command_line: String,
    env: Vec<EnvOverride>,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Creates an invocation with no extra environment and no input.
    #[must_use]
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            env: Vec::new(),
            stdin: None,
        }
    }

    /// Adds environment overrides applied after the inherited environment.
    #[must_use]
    pub fn with_env(mut self, env: &[EnvOverride]) -> Self {
        self.env.extend_from_slice(env);
        self
    }

    /// Supplies bytes written to the process's standard input.
    #[must_use]
    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Shell command line.
    #[must_use]
    pub fn command_line(&self) -> &str {
        self.command_line.as_str()
    }

    /// Environment overrides in application order.
    #[must_use]
    pub fn env(&self) -> &[EnvOverride] {
        &self.env
    }

    /// Standard input payload, if any.
    #[must_use]
    pub fn stdin(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }
}

/// Runs tool commands and captures their combined output.
///
/// The production implementation is [`ShellRunner`]. Tests substitute doubles
/// to script tool behaviour without spawning processes.
pub trait CommandRunner {
    /// Runs `invocation` to completion and returns stdout and stderr combined.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the process cannot be spawned, when piping
    /// fails, or when it exits unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, RunError>;
}

/// Base environment handed to every spawned tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnvironment {
    vars: Vec<(OsString, OsString)>,
}

impl ProcessEnvironment {
    /// Snapshots the environment of the current process.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    /// Builds an environment from explicit pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Applies `overrides` on top of the base environment.
    ///
    /// Later entries replace earlier ones with the same key. Each variable
    /// keeps the position of its first appearance.
    #[must_use]
    pub fn merged(&self, overrides: &[EnvOverride]) -> Vec<(OsString, OsString)> {
        let extra = overrides
            .iter()
            .map(|env| (OsString::from(env.key()), OsString::from(env.value())));

        let mut merged: Vec<(OsString, OsString)> = Vec::with_capacity(self.vars.len());
        let mut positions: HashMap<OsString, usize> = HashMap::new();
        for (key, value) in self.vars.iter().cloned().chain(extra) {
            match positions.get(&key).and_then(|index| merged.get_mut(*index)) {
                Some(slot) => slot.1 = value,
                None => {
                    positions.insert(key.clone(), merged.len());
                    merged.push((key, value));
                }
            }
        }
        merged
    }
}

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    environment: ProcessEnvironment,
}

impl ShellRunner {
    /// Creates a runner whose children see `environment` plus per-tool overrides.
    #[must_use]
    pub const fn new(environment: ProcessEnvironment) -> Self {
        Self { environment }
    }

    /// Base environment used for spawned tools.
    #[must_use]
    pub const fn environment(&self) -> &ProcessEnvironment {
        &self.environment
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, RunError> {
        let command_line = invocation.command_line();
        let io_error = |source| RunError::io(command_line, source);

        let (mut reader, writer) = io::pipe().map_err(io_error)?;
        let stderr = writer.try_clone().map_err(io_error)?;

        let mut command = shell_command(command_line);
        command
            .env_clear()
            .envs(self.environment.merged(invocation.env()))
            .stdout(writer)
            .stderr(stderr)
            .stdin(if invocation.stdin().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        debug!(
            target: RUNNER_TARGET,
            command = command_line,
            overrides = invocation.env().len(),
            stdin_bytes = invocation.stdin().map_or(0, <[u8]>::len),
            "spawning tool"
        );

        let mut child = command
            .spawn()
            .map_err(|source| RunError::spawn(command_line, source))?;
        // The command still owns write ends of the output pipe; they must be
        // closed before the read below can observe end of file.
        drop(command);

        let feeder = match (child.stdin.take(), invocation.stdin()) {
            (Some(stdin), Some(input)) => Some(feed_stdin(stdin, input.to_vec())),
            _ => None,
        };

        let mut output = Vec::new();
        let read = reader.read_to_end(&mut output);
        let status = child.wait().map_err(io_error)?;
        read.map_err(io_error)?;
        if let Some(handle) = feeder {
            join_feeder(handle).map_err(io_error)?;
        }

        debug!(
            target: RUNNER_TARGET,
            command = command_line,
            ?status,
            output_bytes = output.len(),
            "tool exited"
        );

        if status.success() {
            Ok(output)
        } else {
            Err(RunError::NonZeroExit {
                command: command_line.to_owned(),
                status: status.code(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
        }
    }
}

fn shell_command(command_line: &str) -> Command {
    let (shell, flag) = if cfg!(windows) {
        ("cmd", "/c")
    } else {
        ("sh", "-c")
    };
    let mut command = Command::new(shell);
    command.arg(flag).arg(command_line);
    command
}

/// Writes `input` on a separate thread so a tool that produces output before
/// draining its input cannot deadlock against the output pipe.
fn feed_stdin(mut stdin: ChildStdin, input: Vec<u8>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        let result = stdin.write_all(&input);
        drop(stdin);
        match result {
            // Tools are free to ignore their input.
            Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    })
}

fn join_feeder(handle: JoinHandle<io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
}
