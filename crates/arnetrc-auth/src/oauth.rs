//! OAuth 2.0 token endpoint exchanges.
//!
//! Both credential file kinds end in a form-encoded POST to a token endpoint:
//! `authorized_user` files use the refresh token grant (RFC 6749 §6) and
//! `service_account` files use the JWT bearer grant (RFC 7523). The response
//! handling is shared.

use serde::Deserialize;

use crate::error::{AuthError, Result};

/// Google's OAuth 2.0 token endpoint, used when a credentials file omits
/// `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope requested for service account assertions.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Grant type for RFC 7523 JWT bearer assertions.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Raw token response from a token endpoint or the metadata server.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) expires_in: Option<i64>,
}

/// Raw error response from a token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

// ---------------------------------------------------------------------------
// Grants
// ---------------------------------------------------------------------------

/// Exchange a refresh token for an access token.
pub(crate) async fn refresh_token_grant(
    client: &reqwest::Client,
    token_uri: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String> {
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    tracing::debug!(token_uri = token_uri, "refreshing user access token");

    let response = client.post(token_uri).form(&params).send().await?;
    parse_token_response(response).await
}

/// Exchange a signed JWT assertion for an access token.
pub(crate) async fn jwt_bearer_grant(
    client: &reqwest::Client,
    token_uri: &str,
    assertion: &str,
) -> Result<String> {
    let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)];

    tracing::debug!(token_uri = token_uri, "exchanging service account assertion");

    let response = client.post(token_uri).form(&params).send().await?;
    parse_token_response(response).await
}

/// Parse the HTTP response from a token endpoint.
pub(crate) async fn parse_token_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();

    if status.is_success() {
        let token_response: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = ?token_response.expires_in, "token exchange successful");
        non_empty(token_response.access_token)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::InvalidGrant {
            reason: error_reason(status, &body),
        })
    }
}

/// Turn a failed token endpoint body into a human-readable reason.
fn error_reason(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(error_response) => error_response
            .error_description
            .unwrap_or(error_response.error),
        Err(_) => format!("HTTP {status}: {body}"),
    }
}

pub(crate) fn non_empty(token: String) -> Result<String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidGrant {
            reason: "token endpoint returned an empty access token".to_string(),
        });
    }
    Ok(token.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
