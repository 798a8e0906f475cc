//! Token source backed by the gcloud CLI.

use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;

use crate::error::{AuthError, Result};
use crate::source::TokenSource;

/// Name of the gcloud executable on this platform.
#[cfg(windows)]
pub const DEFAULT_PROGRAM: &str = "gcloud.cmd";

/// Name of the gcloud executable on this platform.
#[cfg(not(windows))]
pub const DEFAULT_PROGRAM: &str = "gcloud";

/// Runs `gcloud auth print-access-token` for the logged-in user.
///
/// The child process is killed if the returned future is dropped, so an
/// outer `tokio::time::timeout` cleans up after itself.
#[derive(Debug, Clone)]
pub struct GcloudCli {
    program: OsString,
}

impl GcloudCli {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a specific executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GcloudCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenSource for GcloudCli {
    fn name(&self) -> &'static str {
        "gcloud"
    }

    async fn token(&self) -> Result<String> {
        tracing::debug!(program = ?self.program, "running gcloud auth print-access-token");

        let output = tokio::process::Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AuthError::Gcloud {
                reason: format!("failed to run {}: {e}", self.program.to_string_lossy()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::Gcloud {
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(AuthError::Gcloud {
                reason: "printed an empty access token".to_string(),
            });
        }

        Ok(token)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
