//! thread-counter CLI
//!
//! Launches concurrent sleeping workers and reports the totals.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Console output is the report; logs stay quiet unless RUST_LOG asks
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    cli.run().await?;

    Ok(())
}
