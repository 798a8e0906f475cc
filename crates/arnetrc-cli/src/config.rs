//! Optional TOML configuration.
//!
//! ```toml
//! [auth]
//! timeout_secs = 30
//! gcloud_program = "gcloud"
//!
//! [netrc]
//! host_pattern = "%s-go.pkg.dev"
//! ```
//!
//! Command-line flags win over environment variables, which win over this
//! file, which wins over the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use arnetrc_netrc::HostPattern;
use serde::Deserialize;

/// Location of the config file when none is given explicitly.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arnetrc").join("config.toml"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub auth: AuthSettings,
    pub netrc: NetrcSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// Bound on credential resolution, in seconds.
    pub timeout_secs: u64,
    /// gcloud executable used as the fallback token source.
    pub gcloud_program: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            timeout_secs: arnetrc_auth::DEFAULT_TIMEOUT.as_secs(),
            gcloud_program: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetrcSettings {
    /// Host pattern used when `--host-pattern` is not given.
    pub host_pattern: Option<String>,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicitly named file must exist and parse. The default file is
    /// optional; if it is missing the built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    tracing::debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The effective timeout, preferring `flag` over the file.
    pub fn timeout(&self, flag: Option<u64>) -> Duration {
        Duration::from_secs(flag.unwrap_or(self.auth.timeout_secs))
    }

    /// The effective host pattern, preferring `flag` over the file.
    pub fn host_pattern(&self, flag: Option<&str>) -> Result<HostPattern> {
        match flag.or(self.netrc.host_pattern.as_deref()) {
            Some(pattern) => Ok(HostPattern::parse(pattern)?),
            None => Ok(HostPattern::default()),
        }
    }

    /// The gcloud token source to fall back on.
    pub fn gcloud(&self) -> arnetrc_auth::GcloudCli {
        match &self.auth.gcloud_program {
            Some(program) => arnetrc_auth::GcloudCli::with_program(program),
            None => arnetrc_auth::GcloudCli::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
