//! memprobe - drive a conversation memory service from the command line
//!
//! ```text
//! memprobe health
//! memprobe run comprehensive --wait-scale 0.5
//! memprobe run --scenario contact.ron --user-id test_user_1a2b3c4d
//! memprobe retrieve --user-id test_user_1a2b3c4d --query "contact preferences"
//! memprobe scenarios --show evolution > evolution.ron
//! ```
//!
//! Configuration comes from an optional RON file (`--config`), then the
//! `MEMPROBE_BASE_URL` / `MEMPROBE_TIMEOUT_SECS` environment variables, then
//! command-line flags.

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::RunArgs;
use std::io;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config = cli.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");

    let mut out = io::stdout();
    let outcome = match cli.command {
        Commands::Health => commands::health(&config, &mut out).await?,
        Commands::Run {
            name,
            scenario,
            user_id,
            conversation_id,
        } => {
            commands::run(
                &config,
                RunArgs {
                    name: &name,
                    scenario: scenario.as_deref(),
                    user_id,
                    conversation_id,
                },
                &mut out,
            )
            .await?
        }
        Commands::Add {
            user_id,
            conversation_id,
            kind,
            text,
        } => commands::add(&config, &user_id, &conversation_id, kind, &text, &mut out).await?,
        Commands::Retrieve { user_id, query } => {
            commands::retrieve(&config, &user_id, &query, &mut out).await?
        }
        Commands::Scenarios { show } => commands::scenarios(show.as_deref(), &mut out)?,
    };
    Ok(outcome.into())
}
