//! Application Default Credentials.
//!
//! Looks for credentials in the same places Google's client libraries do:
//!
//! 1. The file named by `GOOGLE_APPLICATION_CREDENTIALS`.
//! 2. gcloud's well-known `application_default_credentials.json`.
//! 3. The GCE metadata server.
//!
//! A credentials file is either an `authorized_user` file (written by
//! `gcloud auth application-default login`) or a `service_account` key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AuthError, Result};
use crate::jwt::{self, Claims};
use crate::oauth::{self, CLOUD_PLATFORM_SCOPE, DEFAULT_TOKEN_URI, TokenResponse};
use crate::source::TokenSource;

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable overriding gcloud's configuration directory.
pub const CLOUDSDK_CONFIG_ENV: &str = "CLOUDSDK_CONFIG";

/// Environment variable overriding the metadata server host.
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const WELL_KNOWN_FILE: &str = "application_default_credentials.json";
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Bound on a single metadata server request.
const METADATA_TIMEOUT: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Credentials file
// ---------------------------------------------------------------------------

/// The subset of a credentials file this crate understands.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum CredentialsFile {
    AuthorizedUser {
        client_id: String,
        client_secret: String,
        refresh_token: String,
        #[serde(default)]
        token_uri: Option<String>,
    },
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default)]
        private_key_id: Option<String>,
        #[serde(default)]
        token_uri: Option<String>,
    },
}

impl CredentialsFile {
    /// Parse a credentials file, reporting unknown `type` values distinctly.
    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(data)?;
        let kind = value
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        match kind.as_str() {
            "authorized_user" | "service_account" => Ok(serde_json::from_value(value)?),
            _ => Err(AuthError::UnsupportedCredentialType { kind }),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where [`ApplicationDefault`] looks for credentials.
#[derive(Debug, Clone)]
pub struct AdcConfig {
    /// Explicit credentials file (`GOOGLE_APPLICATION_CREDENTIALS`).
    pub credentials_file: Option<PathBuf>,
    /// gcloud's well-known credentials file.
    pub well_known_file: Option<PathBuf>,
    /// Host of the metadata server, or `None` to skip it.
    pub metadata_host: Option<String>,
}

impl AdcConfig {
    /// Build the lookup configuration from the process environment.
    pub fn from_env() -> Self {
        let credentials_file = std::env::var_os(CREDENTIALS_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let gcloud_dir = std::env::var_os(CLOUDSDK_CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(default_gcloud_dir);

        let metadata_host = std::env::var(METADATA_HOST_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());

        Self {
            credentials_file,
            well_known_file: gcloud_dir.map(|dir| dir.join(WELL_KNOWN_FILE)),
            metadata_host: Some(metadata_host),
        }
    }
}

/// gcloud keeps its configuration in `~/.config/gcloud` on Unix and
/// `%APPDATA%\gcloud` on Windows.
fn default_gcloud_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        dirs::config_dir().map(|dir| dir.join("gcloud"))
    }

    #[cfg(not(windows))]
    {
        dirs::home_dir().map(|home| home.join(".config").join("gcloud"))
    }
}

// ---------------------------------------------------------------------------
// Token source
// ---------------------------------------------------------------------------

/// Token source backed by Application Default Credentials.
pub struct ApplicationDefault {
    config: AdcConfig,
    client: reqwest::Client,
}

impl ApplicationDefault {
    pub fn new(config: AdcConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AdcConfig::from_env())
    }

    /// Locate the credentials file to use, if any.
    ///
    /// An explicitly configured file must exist; the well-known file is
    /// optional.
    fn credentials_path(&self) -> Result<Option<&Path>> {
        if let Some(path) = &self.config.credentials_file {
            if !path.is_file() {
                return Err(AuthError::ApplicationDefault {
                    reason: format!(
                        "{CREDENTIALS_ENV} points to {}, which does not exist",
                        path.display()
                    ),
                });
            }
            return Ok(Some(path));
        }

        Ok(self
            .config
            .well_known_file
            .as_deref()
            .filter(|path| path.is_file()))
    }

    async fn token_from_file(&self, path: &Path) -> Result<String> {
        tracing::debug!(path = %path.display(), "using credentials file");

        let data = std::fs::read(path)?;
        match CredentialsFile::parse(&data)? {
            CredentialsFile::AuthorizedUser {
                client_id,
                client_secret,
                refresh_token,
                token_uri,
            } => {
                let token_uri = token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
                oauth::refresh_token_grant(
                    &self.client,
                    token_uri,
                    &client_id,
                    &client_secret,
                    &refresh_token,
                )
                .await
            }
            CredentialsFile::ServiceAccount {
                client_email,
                private_key,
                private_key_id,
                token_uri,
            } => {
                let token_uri = token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
                let now = chrono::Utc::now().timestamp();
                let claims = Claims::new(&client_email, CLOUD_PLATFORM_SCOPE, token_uri, now);
                let assertion =
                    jwt::sign_assertion(&claims, private_key_id.as_deref(), &private_key)?;
                oauth::jwt_bearer_grant(&self.client, token_uri, &assertion).await
            }
        }
    }

    async fn token_from_metadata(&self, host: &str) -> Result<String> {
        let url = format!("http://{host}{METADATA_TOKEN_PATH}");
        tracing::debug!(url = %url, "querying metadata server");

        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::ApplicationDefault {
                reason: format!("no credentials file found and metadata server unreachable: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ApplicationDefault {
                reason: format!("metadata server returned HTTP {status}"),
            });
        }

        let token: TokenResponse = response.json().await?;
        oauth::non_empty(token.access_token)
    }
}

#[async_trait]
impl TokenSource for ApplicationDefault {
    fn name(&self) -> &'static str {
        "application-default"
    }

    async fn token(&self) -> Result<String> {
        if let Some(path) = self.credentials_path()? {
            return self.token_from_file(path).await;
        }

        match &self.config.metadata_host {
            Some(host) => self.token_from_metadata(host).await,
            None => Err(AuthError::ApplicationDefault {
                reason: "no credentials file found".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
