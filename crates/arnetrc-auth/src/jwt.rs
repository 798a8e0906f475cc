//! RS256 service account assertions.
//!
//! A service account exchanges a self-signed JWT for an access token. The
//! private key comes from the credentials file as a PKCS#8 PEM block; it is
//! decoded here and handed to `ring` for RSASSA-PKCS1-v1_5 SHA-256 signing.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use serde::Serialize;

use crate::error::{AuthError, Result};

/// Lifetime requested for an assertion, in seconds. Google caps this at one
/// hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Header<'a> {
    alg: &'static str,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

/// Claims of a service account assertion.
#[derive(Debug, Serialize)]
pub(crate) struct Claims<'a> {
    pub(crate) iss: &'a str,
    pub(crate) scope: &'a str,
    pub(crate) aud: &'a str,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

impl<'a> Claims<'a> {
    /// Claims valid from `now` for [`ASSERTION_LIFETIME_SECS`].
    pub(crate) fn new(iss: &'a str, scope: &'a str, aud: &'a str, now: i64) -> Self {
        Self {
            iss,
            scope,
            aud,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Build and sign a compact JWT (`header.claims.signature`).
pub(crate) fn sign_assertion(
    claims: &Claims<'_>,
    key_id: Option<&str>,
    private_key_pem: &str,
) -> Result<String> {
    let header = Header {
        alg: "RS256",
        typ: "JWT",
        kid: key_id,
    };

    let mut signing_input = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
    signing_input.push('.');
    signing_input.push_str(&URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?));

    let der = pem_to_der(private_key_pem)?;
    let key_pair = RsaKeyPair::from_pkcs8(&der).map_err(|e| AuthError::Signing {
        reason: format!("invalid PKCS#8 private key: {e}"),
    })?;

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &RSA_PKCS1_SHA256,
            &SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|_| AuthError::Signing {
            reason: "RSA signing failed".to_string(),
        })?;

    signing_input.push('.');
    signing_input.push_str(&URL_SAFE_NO_PAD.encode(signature));
    Ok(signing_input)
}

/// Strip the PEM armour from a `PRIVATE KEY` block and decode the body.
pub(crate) fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    if body.is_empty() {
        return Err(AuthError::Signing {
            reason: "private key PEM block is empty".to_string(),
        });
    }

    STANDARD.decode(body).map_err(|e| AuthError::Signing {
        reason: format!("private key is not valid base64: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
