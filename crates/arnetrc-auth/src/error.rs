//! Error types for the auth crate.
//!
//! Every credential backend surfaces failures through [`AuthError`]. Variants
//! carry enough context for the command layer to print a useful message
//! without inspecting opaque strings.

use std::path::PathBuf;

/// Unified error type for credential resolution.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // -- Resolution ---------------------------------------------------------
    /// Neither the primary nor the fallback token source produced a token.
    #[error(
        "no credentials found: application default credentials: {primary}; \
         gcloud credentials: {fallback}"
    )]
    NoCredentialsFound {
        /// Why the primary source failed.
        primary: String,
        /// Why the fallback source failed.
        fallback: String,
    },

    /// A token source succeeded but handed back a blank token.
    #[error("{backend} returned an empty access token")]
    EmptyToken { backend: &'static str },

    /// Token resolution did not finish within the allotted time.
    #[error("credential resolution timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    // -- Backends -----------------------------------------------------------
    /// Application Default Credentials could not be found or used.
    #[error("application default credentials: {reason}")]
    ApplicationDefault { reason: String },

    /// The credentials file declares a `type` this crate cannot handle.
    #[error("unsupported credential type: {kind}")]
    UnsupportedCredentialType { kind: String },

    /// Signing the service account assertion failed.
    #[error("failed to sign service account assertion: {reason}")]
    Signing { reason: String },

    /// The token endpoint rejected the grant.
    #[error("invalid grant: {reason}")]
    InvalidGrant { reason: String },

    /// Running the gcloud CLI failed or produced no token.
    #[error("gcloud: {reason}")]
    Gcloud { reason: String },

    // -- Key files ----------------------------------------------------------
    /// The service account key file could not be read.
    #[error("cannot read key file {}: {source}", .path.display())]
    KeyFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Underlying errors --------------------------------------------------
    /// An HTTP request to a token endpoint failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, AuthError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
