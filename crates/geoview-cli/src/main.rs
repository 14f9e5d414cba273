mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod script;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(async { commands::execute(cli).await }) {
        if let Some(cli_error) = e.downcast_ref::<CliError>() {
            cli_error.display();
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}
