/// The refresh loop: run the command once per tick, then redraw the
/// terminal with its captured output, until a termination signal arrives.
use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::runner::CommandRunner;
use crate::screen::Screen;

/// Drive the loop until `shutdown` completes.
///
/// Each cycle waits for the next tick or cancellation, whichever comes
/// first. A tick runs the command to completion — only then is the screen
/// cleared, so the previous output stays visible while the new run is in
/// flight and the redraw never flashes a blank terminal. Execution is
/// strictly sequential: a command slower than the interval absorbs the
/// ticks that fired while it ran, and the next run starts at the next tick
/// after it completes.
///
/// Cancellation is observed only at the between-cycle wait; it triggers one
/// final clear and a termination notice, then the loop returns. Per-cycle
/// failures (launch errors, non-zero exits, terminal write errors) are
/// reported inline and never terminate the loop.
pub async fn run<W, F>(
    runner: &CommandRunner,
    screen: &mut Screen<W>,
    command_line: &str,
    interval: Duration,
    shutdown: F,
) where
    W: Write,
    F: Future<Output = ()>,
{
    // First tick lands one full interval after startup.
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("termination signal received, exiting");
                screen.clear().await;
                if let Err(err) = screen.notice("Exiting rewatch.") {
                    tracing::warn!(%err, "failed to write exit notice");
                }
                return;
            }
            _ = ticker.tick() => {
                let outcome = runner.run(command_line).await;
                screen.clear().await;
                let written = match &outcome {
                    Ok(exec) => {
                        tracing::debug!(
                            exit_code = ?exec.exit_code,
                            output_bytes = exec.output.len(),
                            duration_ms = exec.duration.as_millis() as u64,
                            "command completed"
                        );
                        screen.show(exec)
                    }
                    Err(err) => screen.notice(&format!("error running command: {}", err)),
                };
                if let Err(err) = written {
                    tracing::warn!(%err, "failed to write to terminal");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use tokio::time::{sleep, timeout};

    async fn run_for(command_line: &str, interval_ms: u64, duration_ms: u64) -> String {
        let runner = CommandRunner::new(Platform::Posix);
        let mut screen = Screen::new(Platform::Posix, Vec::new());
        timeout(
            Duration::from_secs(10),
            run(
                &runner,
                &mut screen,
                command_line,
                Duration::from_millis(interval_ms),
                sleep(Duration::from_millis(duration_ms)),
            ),
        )
        .await
        .expect("loop did not stop after cancellation");
        String::from_utf8_lossy(&screen.into_inner()).into_owned()
    }

    #[tokio::test]
    async fn test_cycle_renders_command_output() {
        let out = run_for("echo tick", 10, 100).await;
        assert!(out.contains("tick\n"));
        assert!(!out.contains("status"));
    }

    #[tokio::test]
    async fn test_cycle_annotates_nonzero_exit() {
        let out = run_for("echo partial; exit 3", 10, 100).await;
        assert!(out.contains("partial\n"));
        assert!(out.contains("non-zero status: 3"));
    }

    #[tokio::test]
    async fn test_cancellation_before_first_tick_runs_nothing() {
        let runner = CommandRunner::new(Platform::Posix);
        let mut screen = Screen::new(Platform::Posix, Vec::new());
        timeout(
            Duration::from_secs(5),
            run(
                &runner,
                &mut screen,
                "echo never",
                Duration::from_secs(60),
                async {},
            ),
        )
        .await
        .unwrap();
        let out = String::from_utf8_lossy(&screen.into_inner()).into_owned();
        assert!(!out.contains("never"));
        assert!(out.contains("Exiting rewatch."));
    }

    #[tokio::test]
    async fn test_termination_notice_comes_last() {
        let out = run_for("echo tick", 10, 80).await;
        assert!(out.trim_end().ends_with("Exiting rewatch."));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_error_is_reported_and_loop_continues() {
        // A missing interpreter fails every cycle; the loop must keep
        // ticking rather than bail on the first failure.
        let runner = CommandRunner::new(Platform::Windows);
        let mut screen = Screen::new(Platform::Posix, Vec::new());
        timeout(
            Duration::from_secs(5),
            run(
                &runner,
                &mut screen,
                "echo hello",
                Duration::from_millis(20),
                sleep(Duration::from_millis(150)),
            ),
        )
        .await
        .unwrap();
        let out = String::from_utf8_lossy(&screen.into_inner()).into_owned();
        assert!(out.matches("error running command").count() >= 2);
        assert!(out.contains("Exiting rewatch."));
    }

    #[tokio::test]
    async fn test_fast_command_paced_by_interval() {
        let out = run_for("echo x", 100, 350).await;
        let cycles = out.matches("x\n").count();
        // Ticks at ~100/200/300 ms; allow generous scheduling jitter.
        assert!((1..=4).contains(&cycles), "got {} cycles", cycles);
    }

    #[tokio::test]
    async fn test_slow_command_never_overlaps_itself() {
        // Each run drops a marker file for its lifetime; a second instance
        // started while the marker exists would print OVERLAP.
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("busy");
        let command = format!(
            "if [ -e {m} ]; then echo OVERLAP; fi; touch {m}; sleep 0.15; rm {m}; echo done",
            m = marker.display()
        );
        let out = run_for(&command, 20, 400).await;
        assert!(!out.contains("OVERLAP"), "overlapping execution detected");
        assert!(out.contains("done\n"));
    }
}
