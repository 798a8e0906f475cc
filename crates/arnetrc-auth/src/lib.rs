//! Credential backends for arnetrc.
//!
//! Produces the two kinds of secrets that end up in a `.netrc` file for
//! Artifact Registry Go endpoints:
//!
//! - **Access tokens**, resolved from Application Default Credentials with
//!   the gcloud CLI as a fallback ([`TokenResolver`]).
//! - **Service account keys**, read from a JSON key file and base64-encoded
//!   ([`JsonKeyFile`]).
//!
//! # Architecture
//!
//! ```text
//! TokenResolver
//! ├── ApplicationDefault  (credentials file or metadata server)
//! │   ├── authorized_user  → refresh token grant
//! │   └── service_account  → RS256 JWT bearer grant
//! └── GcloudCli           (gcloud auth print-access-token)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use arnetrc_auth::{GcloudCli, TokenResolver};
//!
//! # async fn example() -> arnetrc_auth::Result<()> {
//! let resolver = TokenResolver::from_env(GcloudCli::new());
//! let token = resolver.resolve_within(Duration::from_secs(30)).await?;
//! println!("access token: {token}");
//! # Ok(())
//! # }
//! ```

pub mod adc;
pub mod error;
pub mod gcloud;
mod jwt;
pub mod key;
pub mod oauth;
pub mod resolver;
pub mod source;

// Re-export key types at the crate root for convenience.
pub use adc::{AdcConfig, ApplicationDefault};
pub use error::{AuthError, Result};
pub use gcloud::GcloudCli;
pub use key::JsonKeyFile;
pub use resolver::{DEFAULT_TIMEOUT, TokenResolver};
pub use source::{KeySource, StaticKey, StaticToken, TokenSource};
