//! CLI entry point for arnetrc.
//!
//! This binary provides the `arnetrc` command with subcommands for adding
//! Artifact Registry Go endpoints to `.netrc`, refreshing their tokens, and
//! answering Go's GOAUTH protocol.

mod cli;
mod commands;
mod config;
mod helpers;

use anyhow::Result;
use arnetrc_auth::TokenResolver;
use arnetrc_netrc::{Location, NetrcStore};
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::config::Settings;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    helpers::init_tracing("info");

    let settings = Settings::load(cli.config.as_deref())?;
    let timeout = settings.timeout(cli.timeout_secs);

    match cli.command {
        Commands::Refresh => {
            let store = NetrcStore::locate(cli.netrc.as_deref())?;
            let tokens = TokenResolver::from_env(settings.gcloud());
            commands::refresh(&store, &tokens, timeout).await?;
        }
        Commands::AddLocations {
            locations,
            json_key,
            host_pattern,
        } => {
            // Validate all input before looking at the filesystem.
            let pattern = settings.host_pattern(host_pattern.as_deref())?;
            let locations = Location::parse_list(&locations)?;
            let store = NetrcStore::locate(cli.netrc.as_deref())?;
            commands::add_locations(&store, &locations, &pattern, json_key.as_deref())?;
        }
        Commands::Goauth {
            location,
            json_key,
            host_pattern,
        } => {
            let pattern = settings.host_pattern(host_pattern.as_deref())?;
            let tokens = TokenResolver::from_env(settings.gcloud());
            let response =
                commands::goauth(&location, &pattern, json_key.as_deref(), &tokens, timeout)
                    .await?;
            print!("{response}");
        }
    }

    Ok(())
}
