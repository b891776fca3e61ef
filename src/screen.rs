/// Terminal display: best-effort clearing plus rendering of captured command
/// output and its annotations.
use std::io::Write;

use crate::platform::Platform;
use crate::runner::Execution;

pub struct Screen<W> {
    platform: Platform,
    writer: W,
}

impl Screen<std::io::Stdout> {
    pub fn stdout(platform: Platform) -> Self {
        Screen::new(platform, std::io::stdout())
    }
}

impl<W: Write> Screen<W> {
    pub fn new(platform: Platform, writer: W) -> Self {
        Self { platform, writer }
    }

    /// Clear the visible terminal buffer by running the platform clear
    /// command and forwarding its escape sequences. Clearing is cosmetic;
    /// any failure is ignored.
    pub async fn clear(&mut self) {
        let mut cmd = self.platform.clear_command();
        match cmd.output().await {
            Ok(out) if out.status.success() => {
                let _ = self.writer.write_all(&out.stdout);
                let _ = self.writer.flush();
            }
            Ok(out) => {
                tracing::debug!(status = ?out.status.code(), "clear command failed");
            }
            Err(err) => {
                tracing::debug!(%err, "clear command could not run");
            }
        }
    }

    /// Write the captured output verbatim (escape sequences included),
    /// followed by an annotation when the command did not exit cleanly.
    pub fn show(&mut self, exec: &Execution) -> std::io::Result<()> {
        self.writer.write_all(&exec.output)?;
        match exec.exit_code {
            Some(0) => {}
            Some(code) => {
                writeln!(
                    self.writer,
                    "\n--- command exited with non-zero status: {} ---",
                    code
                )?;
            }
            None => {
                writeln!(self.writer, "\n--- command terminated by signal ---")?;
            }
        }
        self.writer.flush()
    }

    /// Write a standalone one-line message (launch errors, exit notice).
    pub fn notice(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
