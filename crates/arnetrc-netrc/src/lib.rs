//! `.netrc` reconciliation for Artifact Registry Go endpoints.
//!
//! Go's module tooling reads credentials for private module hosts from the
//! user's `.netrc`. This crate keeps the entries for regional Artifact
//! Registry Go endpoints in that file up to date without disturbing anything
//! else in it.
//!
//! # Architecture
//!
//! ```text
//! store (NetrcStore)          load / persist with -old backup
//!   |
//! reconcile                   refresh(text, token)
//!   |                         add_configs(text, locations, pattern, key)
//! codec                       Entry rendering, token stanza discovery
//!   |
//! host                        Location, HostPattern
//! ```
//!
//! The reconcile functions are pure text-to-text transforms. Credentials
//! come in through the [`arnetrc_auth::KeySource`] trait (for add) or as a
//! plain token string (for refresh).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use arnetrc_netrc::{HostPattern, Location, NetrcStore, add_configs, refresh};
//!
//! # fn main() -> arnetrc_netrc::Result<()> {
//! let store = NetrcStore::locate(None)?;
//! let text = store.load()?;
//!
//! let locations = Location::parse_list("us-west1,europe-west4")?;
//! let outcome = add_configs(&text, &locations, &HostPattern::default(), None)?;
//! let text = refresh(&outcome.netrc, "ya29.example");
//!
//! store.persist(&text)?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod host;
pub mod reconcile;
pub mod store;

pub use codec::{Entry, Login, SERVICE_DOMAIN_SUFFIX, TOKEN_PLACEHOLDER, TokenEntryMatch};
pub use error::{NetrcError, Result};
pub use host::{DEFAULT_HOST_PATTERN, HostPattern, Location};
pub use reconcile::{AddOutcome, add_configs, refresh};
pub use store::NetrcStore;
