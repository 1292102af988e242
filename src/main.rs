mod auth;
mod cli;
mod config;
mod error;
mod executor;
mod fsops;
mod generator;
mod gitlab;
mod history;
mod index;
mod output;
mod publish;
mod retention;
mod sanitize;
mod scrub;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    // CI job logs should show progress without RUST_LOG being set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting allure-pages - Allure Report Publisher");
    cli.execute().await?;

    Ok(())
}
