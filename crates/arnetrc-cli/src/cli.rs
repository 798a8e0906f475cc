//! CLI argument definitions for arnetrc.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// arnetrc -- keeps Artifact Registry Go credentials in your `.netrc`.
#[derive(Parser)]
#[command(
    name = "arnetrc",
    version,
    about = "Update your .netrc file to work with Artifact Registry Go repositories",
    long_about = "Adds regional Artifact Registry Go endpoints to your .netrc file and \
                  refreshes their OAuth access tokens. Also acts as a GOAUTH helper."
)]
pub struct Cli {
    /// The .netrc file, or the directory holding it. Defaults to your home
    /// directory.
    #[arg(long, env = "NETRC", global = true)]
    pub netrc: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, env = "ARNETRC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Give up on credential resolution after this many seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh OAuth tokens for every Artifact Registry Go endpoint.
    Refresh,

    /// Add regional Artifact Registry Go endpoints to the .netrc file.
    AddLocations {
        /// Comma-separated locations, e.g. `us-west1,europe-west4`.
        #[arg(long)]
        locations: String,

        /// Service account JSON key to use for these locations. Without it
        /// the entries use an OAuth token that `refresh` keeps current.
        #[arg(long, alias = "json_key")]
        json_key: Option<PathBuf>,

        /// Server host pattern; `%s` is replaced by the location.
        #[arg(long, alias = "host_pattern")]
        host_pattern: Option<String>,
    },

    /// Print credentials for one location in Go's GOAUTH format.
    Goauth {
        /// Location to authenticate against, e.g. `us-central1`.
        location: String,

        /// Service account JSON key to authenticate with instead of an
        /// OAuth token.
        #[arg(long, alias = "json_key")]
        json_key: Option<PathBuf>,

        /// Server host pattern; `%s` is replaced by the location.
        #[arg(long, alias = "host_pattern")]
        host_pattern: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add_locations() {
        let cli = Cli::try_parse_from([
            "arnetrc",
            "add-locations",
            "--locations",
            "us-west1,europe-east1",
            "--json_key",
            "key.json",
        ])
        .unwrap();

        match cli.command {
            Commands::AddLocations {
                locations,
                json_key,
                host_pattern,
            } => {
                assert_eq!(locations, "us-west1,europe-east1");
                assert_eq!(json_key, Some(PathBuf::from("key.json")));
                assert_eq!(host_pattern, None);
            }
            _ => panic!("expected add-locations"),
        }
    }

    #[test]
    fn add_locations_requires_locations() {
        assert!(Cli::try_parse_from(["arnetrc", "add-locations"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "arnetrc",
            "refresh",
            "--netrc",
            "/tmp/x",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Refresh));
        assert_eq!(cli.netrc, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn parse_goauth() {
        let cli = Cli::try_parse_from([
            "arnetrc",
            "goauth",
            "us-central1",
            "--host-pattern",
            "%s-staging-go.pkg.dev",
        ])
        .unwrap();
        match cli.command {
            Commands::Goauth {
                location,
                host_pattern,
                ..
            } => {
                assert_eq!(location, "us-central1");
                assert_eq!(host_pattern.as_deref(), Some("%s-staging-go.pkg.dev"));
            }
            _ => panic!("expected goauth"),
        }
    }
}
