use anyhow::Result;
use colorlink_cli::{cli, commands, logging, ColorlinkConfig};
use std::io::Write;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let invocation = match cli::parse_from(std::env::args_os()) {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    let config = ColorlinkConfig::load(invocation.config.as_deref())?;
    logging::init(&config.logging, invocation.json_logs)?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling pass");
                cancel.cancel();
            }
        }
    });

    let outcome = match commands::run(invocation.action, config, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            return Err(e);
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(outcome.render()?.as_bytes())?;
    stdout.flush()?;

    Ok(if outcome.cancelled() {
        ExitCode::from(EXIT_CANCELLED)
    } else {
        ExitCode::SUCCESS
    })
}
