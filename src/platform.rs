use std::process::Stdio;
use tokio::process::Command;

/// Host platform conventions for running shell commands and clearing the
/// terminal. Selected once at startup; every call site goes through it
/// instead of branching inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// POSIX-like: `sh -c CMD`, `clear`.
    Posix,
    /// Windows: `cmd /c CMD`, `cmd /c cls`.
    Windows,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Build the interpreter invocation for a full command line.
    /// The command line is passed through as a single argument; no quoting
    /// correction is applied.
    pub fn shell_command(&self, command_line: &str) -> Command {
        let mut cmd = match self {
            Platform::Posix => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c");
                cmd
            }
            Platform::Windows => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/c");
                cmd
            }
        };
        cmd.arg(command_line);
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Build the clear-screen invocation.
    pub fn clear_command(&self) -> Command {
        let mut cmd = match self {
            Platform::Posix => Command::new("clear"),
            Platform::Windows => {
                let mut cmd = Command::new("cmd");
                cmd.args(["/c", "cls"]);
                cmd
            }
        };
        cmd.stdin(Stdio::null());
        cmd
    }
}
