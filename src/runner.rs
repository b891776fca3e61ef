/// Single command execution: run a command line through the platform shell,
/// capture combined stdout+stderr, report the exit code.
use std::io::Read;
use std::process::Stdio;
use std::time::Instant;

use crate::platform::Platform;

/// Result of one completed command execution.
#[derive(Debug)]
pub struct Execution {
    /// Combined stdout+stderr bytes, interleaved in write order.
    pub output: Vec<u8>,
    /// Process exit code (None if killed by a signal).
    pub exit_code: Option<i32>,
    /// Wall-clock duration of the run.
    pub duration: std::time::Duration,
}

/// Errors that prevent a command from running at all. A command that starts
/// and exits non-zero is not an error; that is reported via `Execution`.
#[derive(Debug)]
pub enum RunError {
    /// Failed to set up the capture pipe.
    Capture { source: std::io::Error },
    /// Failed to spawn the shell subprocess.
    Spawn { source: std::io::Error },
    /// Failed while waiting for the subprocess or draining its output.
    Wait { source: std::io::Error },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Capture { source } => {
                write!(f, "failed to set up output capture: {}", source)
            }
            RunError::Spawn { source } => {
                write!(f, "failed to start command: {}", source)
            }
            RunError::Wait { source } => {
                write!(f, "failed to collect command output: {}", source)
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Capture { source } => Some(source),
            RunError::Spawn { source } => Some(source),
            RunError::Wait { source } => Some(source),
        }
    }
}

/// Runs command lines through the platform shell, one at a time.
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner {
    platform: Platform,
}

impl CommandRunner {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Execute the command line and block until it finishes.
    ///
    /// The child's stdout and stderr share a single pipe, so the captured
    /// bytes arrive interleaved in write order. stdin is null; the command
    /// must not require operator interaction. No timeout is applied — a
    /// command that never exits blocks the caller indefinitely.
    pub async fn run(&self, command_line: &str) -> Result<Execution, RunError> {
        let (mut reader, writer) =
            std::io::pipe().map_err(|e| RunError::Capture { source: e })?;
        let writer_stderr = writer
            .try_clone()
            .map_err(|e| RunError::Capture { source: e })?;

        let mut cmd = self.platform.shell_command(command_line);
        cmd.stdout(Stdio::from(writer));
        cmd.stderr(Stdio::from(writer_stderr));

        tracing::debug!(command = %command_line, "spawning command");
        let start = Instant::now();

        let spawned = cmd.spawn();
        // The Command still owns copies of the pipe write end; they must be
        // closed before the reader can see EOF.
        drop(cmd);
        let mut child = spawned.map_err(|e| RunError::Spawn { source: e })?;

        // Drain the pipe while the child runs; output larger than the pipe
        // buffer would otherwise deadlock the child against the reader.
        let capture = tokio::task::spawn_blocking(move || {
            let mut output = Vec::new();
            reader.read_to_end(&mut output).map(|_| output)
        });

        let status = child
            .wait()
            .await
            .map_err(|e| RunError::Wait { source: e })?;
        let output = capture
            .await
            .map_err(|e| RunError::Wait {
                source: std::io::Error::other(e),
            })?
            .map_err(|e| RunError::Wait { source: e })?;

        Ok(Execution {
            output,
            exit_code: status.code(),
            duration: start.elapsed(),
        })
    }
}
