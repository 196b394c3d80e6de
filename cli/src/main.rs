//! `confessions`: runs the confession publisher from the command line.

mod cli;
mod commands;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};
use crate::commands::{generate_completions, run_post};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();

    timing::init_tracing(cli.verbose, cli.timing);

    // A missing .env file is fine; scheduled runs get their settings from the environment.
    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {e}");
    }

    match cli.command {
        Commands::Post => run_post().await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}
