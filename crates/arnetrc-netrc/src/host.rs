//! Locations and the host patterns that turn them into endpoints.

use std::fmt;
use std::str::FromStr;

use crate::error::{NetrcError, Result};

/// The placeholder a host pattern substitutes a location into.
pub const PLACEHOLDER: &str = "%s";

/// Host pattern for regional Artifact Registry Go endpoints.
pub const DEFAULT_HOST_PATTERN: &str = "%s-go.pkg.dev";

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A location identifier such as `us-west1`.
///
/// Locations never contain whitespace, `/` or `:`, so a URL can not slip in
/// where a region was expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |reason: &str| NetrcError::InvalidLocation {
            location: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("location is empty"));
        }
        if s.contains(['/', ':']) {
            return Err(invalid(
                "location has to be a Google Cloud region, e.g. 'us-central1', not a URL",
            ));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("location must not contain whitespace"));
        }

        Ok(Self(s.to_string()))
    }

    /// Parse a comma-separated list, trimming each item and dropping empty
    /// ones. An empty result is [`NetrcError::MissingLocations`].
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        let locations = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;

        if locations.is_empty() {
            return Err(NetrcError::MissingLocations);
        }
        Ok(locations)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Location {
    type Err = NetrcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// HostPattern
// ---------------------------------------------------------------------------

/// A host template with exactly one [`PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPattern(String);

impl HostPattern {
    /// Hosts end up on a `machine` line, so whitespace and control
    /// characters are rejected along with a wrong placeholder count.
    pub fn parse(pattern: &str) -> Result<Self> {
        let valid = pattern.matches(PLACEHOLDER).count() == 1
            && !pattern.chars().any(|c| c.is_whitespace() || c.is_control());
        if !valid {
            return Err(NetrcError::InvalidHostPattern {
                pattern: pattern.to_string(),
            });
        }
        Ok(Self(pattern.to_string()))
    }

    /// The concrete host for `location`.
    pub fn host_for(&self, location: &Location) -> String {
        self.0.replacen(PLACEHOLDER, location.as_str(), 1)
    }

    /// The HTTPS origin for `location`.
    pub fn url_for(&self, location: &Location) -> String {
        format!("https://{}", self.host_for(location))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HostPattern {
    fn default() -> Self {
        Self(DEFAULT_HOST_PATTERN.to_string())
    }
}

impl FromStr for HostPattern {
    type Err = NetrcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
