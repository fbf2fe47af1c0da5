mod cli;
mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (RUST_LOG takes precedence)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pprecalc=info,pprecalc_cli=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    commands::recalc::run(args).await
}
