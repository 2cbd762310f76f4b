use std::process::ExitCode;

use anyhow::Context;
use bws_cli::cli::{self, Cli};
use bws_cli::domain::Verbosity;
use bws_cli::report::Reporter;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let verbosity = cli.command.common().verbosity;
    init_tracing(verbosity);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    match runtime.block_on(cli::run(cli)) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            tracing::debug!(error = ?error, "invocation failed");
            Reporter::stdio(verbosity)
                .render_error(&error)
                .context("failed to report the error")?;
            Ok(ExitCode::from(error.exit_code()))
        }
    }
}

/// Logs go to stderr so they never interleave with rendered results.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
