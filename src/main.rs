// Entrypoint for the CLI.
// - Parses flags/env, sets up tracing and hands explicit settings to the
//   workflow.
// - Returns `anyhow::Result` so any fatal step exits non-zero with its
//   error chain on stderr.

use bfhl_submit::{cli::Cli, config, workflow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = config::load_settings(cli.overrides(), cli.config.as_deref(), cli.interactive)?;
    workflow::execute(&settings)?;
    Ok(())
}
