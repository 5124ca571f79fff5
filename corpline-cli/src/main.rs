//! Corpline CLI - Command-line interface
//!
//! Provides command-line access to the Corpline lookup proxy.

mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "corpline")]
#[command(about = "A corporate outline lookup proxy")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    commands::handle_command(cli.command).await?;

    Ok(())
}
