//! Primary/fallback token resolution.

use std::time::Duration;

use async_trait::async_trait;

use crate::adc::ApplicationDefault;
use crate::error::{AuthError, Result};
use crate::gcloud::GcloudCli;
use crate::source::TokenSource;

/// Default bound on how long token resolution may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tries a primary token source and falls back to a second one.
///
/// The default pairing is Application Default Credentials first, then the
/// gcloud CLI. When both fail the two failure reasons are reported together
/// in [`AuthError::NoCredentialsFound`].
pub struct TokenResolver {
    primary: Box<dyn TokenSource>,
    fallback: Box<dyn TokenSource>,
}

impl TokenResolver {
    pub fn new(primary: Box<dyn TokenSource>, fallback: Box<dyn TokenSource>) -> Self {
        Self { primary, fallback }
    }

    /// Application Default Credentials from the environment, falling back to
    /// the given gcloud CLI.
    pub fn from_env(gcloud: GcloudCli) -> Self {
        Self::new(
            Box::new(ApplicationDefault::from_env()),
            Box::new(gcloud),
        )
    }

    /// Resolve a token, giving up after `timeout`.
    pub async fn resolve_within(&self, timeout: Duration) -> Result<String> {
        tokio::time::timeout(timeout, self.token())
            .await
            .map_err(|_| AuthError::Timeout {
                seconds: timeout.as_secs(),
            })?
    }
}

#[async_trait]
impl TokenSource for TokenResolver {
    fn name(&self) -> &'static str {
        "resolver"
    }

    async fn token(&self) -> Result<String> {
        let primary_err = match attempt(self.primary.as_ref()).await {
            Ok(token) => {
                tracing::debug!(source = self.primary.name(), "resolved access token");
                return Ok(token);
            }
            Err(e) => e,
        };
        tracing::debug!(
            source = self.primary.name(),
            error = %primary_err,
            "token source failed, trying fallback"
        );

        match attempt(self.fallback.as_ref()).await {
            Ok(token) => {
                tracing::debug!(source = self.fallback.name(), "resolved access token");
                Ok(token)
            }
            Err(fallback_err) => {
                tracing::debug!(
                    source = self.fallback.name(),
                    error = %fallback_err,
                    "fallback token source failed"
                );
                Err(AuthError::NoCredentialsFound {
                    primary: primary_err.to_string(),
                    fallback: fallback_err.to_string(),
                })
            }
        }
    }
}

/// Ask `source` for a token. Surrounding whitespace is dropped and a blank
/// token counts as a failure of that source.
async fn attempt(source: &dyn TokenSource) -> Result<String> {
    let token = source.token().await?;
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken {
            backend: source.name(),
        });
    }
    Ok(token.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
