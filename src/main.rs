// Entry point of the docs-tabs CLI.
//
// This file's job is to:
// 1. Load configuration (.env, environment, command line)
// 2. Set up logging on stderr so stdout carries only the JSON result
// 3. Run the chosen pipeline and map its outcome to the exit code

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use docs_tabs::cli::commands;
use docs_tabs::cli::output::print_error;
use docs_tabs::cli::Cli;
use docs_tabs::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            print_error(&format!("{:#}", e));
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = AppConfig::from_env()?;
    commands::run(cli.command, &config).await
}
