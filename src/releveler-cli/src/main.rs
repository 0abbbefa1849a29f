mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings go to stdout; logs stay on stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "releveler=info,releveler_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Patch(args) => {
            let config_path = Config::resolve_path(cli.config.as_deref())?;
            let config = Config::load_from(&config_path)?;
            commands::patch::handle(&args, &config)?;
        }

        Commands::Rules { command } => {
            commands::rules::dispatch(command)?;
        }

        Commands::Configure {
            exclude_mod,
            include_mod,
            ignore_npc,
            unignore_npc,
            rules,
            output,
            show,
        } => {
            let config_path = Config::resolve_path(cli.config.as_deref())?;
            let changes = commands::configure::ConfigChanges {
                exclude_mod,
                include_mod,
                ignore_npc,
                unignore_npc,
                rules,
                output,
            };
            commands::configure::handle(&config_path, changes, show)?;
        }
    }

    Ok(())
}
