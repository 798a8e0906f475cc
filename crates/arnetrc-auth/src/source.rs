//! Backend abstractions.
//!
//! A [`TokenSource`] produces an OAuth access token, a [`KeySource`] produces
//! a base64-encoded service account key. The netrc crate only ever talks to
//! credentials through these two traits.

use async_trait::async_trait;

use crate::error::Result;

/// Something that can mint an OAuth 2.0 access token.
///
/// Implementations must be `Send + Sync` so the resolver can hold them as
/// trait objects across `.await` points.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Short name used in log lines and error messages.
    fn name(&self) -> &'static str;

    /// Obtain a fresh access token.
    async fn token(&self) -> Result<String>;
}

/// Something that can produce a base64-encoded service account key.
pub trait KeySource {
    /// Return the key, base64-encoded with the standard alphabet.
    fn encoded_key(&self) -> Result<String>;
}

/// A token source that always yields the same token.
///
/// Handy for tests and for callers that already hold a token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A key source that always yields the same encoded key.
#[derive(Debug, Clone)]
pub struct StaticKey(pub String);

impl KeySource for StaticKey {
    fn encoded_key(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
