//! Netrc error types.
//!
//! Every operation in this crate surfaces errors through [`NetrcError`].

use std::path::PathBuf;

use arnetrc_auth::AuthError;

/// Unified error type for `.netrc` reconciliation and storage.
#[derive(Debug, thiserror::Error)]
pub enum NetrcError {
    // -- Input validation ---------------------------------------------------
    /// The host pattern does not contain exactly one `%s`, or contains
    /// whitespace.
    #[error("host pattern {pattern:?} must contain exactly one %s and no whitespace")]
    InvalidHostPattern { pattern: String },

    /// A location is not a bare location identifier.
    #[error("invalid location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    /// No locations were given to an add operation.
    #[error("at least one location is required")]
    MissingLocations,

    // -- Store errors -------------------------------------------------------
    /// The `.netrc` path could not be determined.
    #[error("cannot locate .netrc file: {reason}")]
    StoreLocate { reason: String },

    /// The `.netrc` file exists but could not be read.
    #[error("cannot load {}: {source}", .path.display())]
    StoreLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backup rotation or the final write failed.
    #[error("cannot save {}: {source}", .path.display())]
    StorePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Credentials --------------------------------------------------------
    /// The service account key could not be resolved.
    #[error("cannot resolve key: {0}")]
    Key(#[from] AuthError),
}

/// Convenience alias used throughout the netrc crate.
pub type Result<T> = std::result::Result<T, NetrcError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
