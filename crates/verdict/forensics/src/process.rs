//! Time-boxed external process execution.
//!
//! Every external program the audit touches goes through [`ProcessRunner`]:
//! arguments are passed as a vector (never through a shell), output and exit
//! status are captured, and the child is killed when its budget runs out.

use crate::error::ExtractionError;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Captured result of a finished process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[derive(Clone, Debug)]
pub struct ProcessRunner {
    timeout: Duration,
    env: Vec<(String, String)>,
}

impl ProcessRunner {
    /// Git prompts are disabled so a private repository fails fast instead
    /// of blocking on credentials.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            env: vec![("GIT_TERMINAL_PROMPT".into(), "0".into())],
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<ProcessOutput, ExtractionError> {
        self.run_with_input(program, args, cwd, None).await
    }

    /// Run `program`, optionally feeding `input` on stdin.
    #[instrument(skip(self, input), fields(timeout = ?self.timeout))]
    pub async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        input: Option<&[u8]>,
    ) -> Result<ProcessOutput, ExtractionError> {
        let command_line = render_command(program, args);
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let spawn_error = |err: std::io::Error| ExtractionError::Spawn {
            command: command_line.clone(),
            message: err.to_string(),
        };

        let mut child = command.spawn().map_err(spawn_error)?;
        let stdin = child.stdin.take();

        // Stdin is fed while output drains, so neither side can fill a pipe
        // and stall the other.
        let feed = async move {
            if let (Some(mut stdin), Some(bytes)) = (stdin, input) {
                ignore_broken_pipe(stdin.write_all(bytes).await)?;
                ignore_broken_pipe(stdin.shutdown().await)?;
            }
            Ok::<(), io::Error>(())
        };
        let run = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(output)) => {
                let output = ProcessOutput {
                    status: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                debug!(command = %command_line, status = ?output.status, "process finished");
                Ok(output)
            }
            Ok(Err(err)) => Err(spawn_error(err)),
            Err(_) => {
                // Dropping the future drops the child, which kills it.
                warn!(command = %command_line, "process timed out");
                Err(ExtractionError::Timeout {
                    command: command_line.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

/// A child that exits without reading all of its input is not a failure.
fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max` characters of `text`, trimmed.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect()
}
