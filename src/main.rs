mod platform;
mod runner;
mod screen;
mod signals;
mod watcher;

use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::platform::Platform;
use crate::runner::CommandRunner;
use crate::screen::Screen;

/// Repeatedly run a shell command at a fixed interval, clearing the
/// terminal and showing the latest output. A watch(1) alternative.
#[derive(Parser, Debug)]
#[command(name = "rewatch", version, about)]
pub struct Cli {
    /// Refresh interval in seconds (fractional values allowed, e.g. 0.5)
    #[arg(value_name = "INTERVAL_SECONDS", value_parser = parse_interval)]
    interval: Duration,

    /// Command to run, passed as-is to the platform shell
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

/// Interval must be a positive, finite number of seconds.
fn parse_interval(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!(
            "interval must be a positive number of seconds, got `{raw}`"
        ));
    }
    Ok(Duration::from_secs_f64(secs))
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            // Bad or missing arguments exit 1, not clap's default 2.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    // Diagnostics go to stderr so they never mix into the watched display;
    // silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let platform = Platform::detect();
    let command_line = cli.command.join(" ");
    tracing::debug!(
        ?platform,
        interval = ?cli.interval,
        command = %command_line,
        "rewatch starting"
    );

    let mut shutdown = match signals::Shutdown::install() {
        Ok(shutdown) => shutdown,
        Err(err) => {
            eprintln!("error: failed to install signal handlers: {err}");
            std::process::exit(1);
        }
    };

    let runner = CommandRunner::new(platform);
    let mut screen = Screen::stdout(platform);
    watcher::run(
        &runner,
        &mut screen,
        &command_line,
        cli.interval,
        shutdown.recv(),
    )
    .await;
    // Graceful cancellation: timer and signal subscription are dropped
    // here and the process exits 0.
}
