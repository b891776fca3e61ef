/// Signal handling for graceful shutdown.
///
/// SIGINT (Ctrl-C) and SIGTERM both request a clean exit; whichever arrives
/// first wins. The subscription is installed once at startup and owned by
/// the caller, so teardown happens on drop along every exit path.
use std::io;

#[cfg(unix)]
pub struct Shutdown {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Shutdown {
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first termination signal.
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {
                tracing::debug!("received SIGINT");
            }
            _ = self.terminate.recv() => {
                tracing::debug!("received SIGTERM");
            }
        }
    }
}

#[cfg(not(unix))]
pub struct Shutdown;

#[cfg(not(unix))]
impl Shutdown {
    pub fn install() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::debug!(%err, "ctrl-c listener failed");
            std::future::pending::<()>().await;
        }
    }
}
