//! Subcommand implementations.
//!
//! Each command takes its collaborators as arguments so tests can point it at
//! a temporary `.netrc` and a canned token source.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use arnetrc_auth::{JsonKeyFile, KeySource, TokenResolver};
use arnetrc_netrc::{AddOutcome, Entry, HostPattern, Location, NetrcStore, codec};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Subcommand: refresh
// ---------------------------------------------------------------------------

/// Replace the token in every Artifact Registry token entry.
///
/// Returns how many entries were refreshed. A file without token entries is
/// left alone and no token is requested.
pub async fn refresh(
    store: &NetrcStore,
    tokens: &TokenResolver,
    timeout: Duration,
) -> Result<usize> {
    let netrc = store.load()?;

    let entries = codec::find_token_entries(&netrc).len();
    if entries == 0 {
        warn!(
            path = %store.path().display(),
            "no Artifact Registry token entries found, run add-locations first"
        );
        return Ok(0);
    }

    let token = tokens
        .resolve_within(timeout)
        .await
        .context("failed to obtain an access token")?;

    let refreshed = arnetrc_netrc::refresh(&netrc, &token);
    store.persist(&refreshed)?;

    info!(entries, "refresh completed");
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Subcommand: add-locations
// ---------------------------------------------------------------------------

/// Add entries for `locations` to the `.netrc`.
///
/// The file is only written when at least one entry was added.
pub fn add_locations(
    store: &NetrcStore,
    locations: &[Location],
    pattern: &HostPattern,
    json_key: Option<&Path>,
) -> Result<AddOutcome> {
    let key = json_key.map(JsonKeyFile::new);

    let netrc = store.load()?;
    let outcome = arnetrc_netrc::add_configs(
        &netrc,
        locations,
        pattern,
        key.as_ref().map(|k| k as &dyn KeySource),
    )?;

    if outcome.changed() {
        store.persist(&outcome.netrc)?;
        info!(
            added = outcome.added.len(),
            skipped = outcome.skipped.len(),
            "add locations completed"
        );
    } else {
        info!("all locations already present, .netrc left unchanged");
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Subcommand: goauth
// ---------------------------------------------------------------------------

/// Build the GOAUTH response for one location.
///
/// The result is the origin URL, a blank line, the `Authorization` header and
/// a terminating blank line. Nothing is written to disk.
pub async fn goauth(
    location: &str,
    pattern: &HostPattern,
    json_key: Option<&Path>,
    tokens: &TokenResolver,
    timeout: Duration,
) -> Result<String> {
    let location = Location::parse(location)?;
    let host = pattern.host_for(&location);

    let entry = match json_key {
        Some(path) => {
            let key = JsonKeyFile::new(path)
                .encoded_key()
                .context("failed to encode JSON key")?;
            Entry::json_key(host, key)
        }
        None => {
            let token = tokens
                .resolve_within(timeout)
                .await
                .context("failed to get oauth token")?;
            Entry::access_token(host, token)
        }
    };

    Ok(format!(
        "{}\n\nAuthorization: {}\n\n",
        pattern.url_for(&location),
        entry.basic_auth_header()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
