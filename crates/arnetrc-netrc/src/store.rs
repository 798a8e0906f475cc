//! Loading and saving the `.netrc` file.
//!
//! Saving always rotates the current file into a `-old` backup first, so the
//! previous content is on disk before any new byte is written.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{NetrcError, Result};

/// File name used when the configured path names a directory.
pub const NETRC_FILE_NAME: &str = ".netrc";

/// Suffix appended to the file path for the backup copy.
pub const BACKUP_SUFFIX: &str = "-old";

/// Handle to one `.netrc` file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetrcStore {
    path: PathBuf,
}

impl NetrcStore {
    /// Work out which file to use.
    ///
    /// `override_path` is what the user configured (typically `$NETRC`). If
    /// its file name ends in `.netrc` it is the file itself, otherwise it is
    /// the directory holding `.netrc`. Without an override the home
    /// directory is used. The containing directory must already exist.
    pub fn locate(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) if names_netrc_file(p) => p.to_path_buf(),
            Some(p) => p.join(NETRC_FILE_NAME),
            None => dirs::home_dir()
                .ok_or_else(|| NetrcError::StoreLocate {
                    reason: "home directory could not be determined".into(),
                })?
                .join(NETRC_FILE_NAME),
        };

        let parent = match path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => {
                return Err(NetrcError::StoreLocate {
                    reason: format!("{} has no parent directory", path.display()),
                });
            }
        };
        if !parent.is_dir() {
            return Err(NetrcError::StoreLocate {
                reason: format!("directory {} does not exist", parent.display()),
            });
        }

        tracing::debug!(path = %path.display(), "located .netrc file");
        Ok(Self { path })
    }

    /// Use `path` as the file without any checks.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup written by [`persist`](Self::persist).
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Read the whole file. A missing file reads as empty.
    pub fn load(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                tracing::debug!(path = %self.path.display(), bytes = text.len(), "loaded .netrc");
                Ok(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), ".netrc does not exist yet");
                Ok(String::new())
            }
            Err(source) => Err(NetrcError::StoreLoad {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replace the file content with `text`, keeping the previous content in
    /// [`backup_path`](Self::backup_path).
    pub fn persist(&self, text: &str) -> Result<()> {
        let backup = self.backup_path();

        remove_if_exists(&backup).map_err(|source| NetrcError::StorePersist {
            path: backup.clone(),
            source,
        })?;

        match std::fs::rename(&self.path, &backup) {
            Ok(()) => tracing::debug!(backup = %backup.display(), "rotated previous .netrc"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(NetrcError::StorePersist {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        self.write_replacing(text)
            .map_err(|source| NetrcError::StorePersist {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(path = %self.path.display(), "saved .netrc");
        Ok(())
    }

    /// Write to a sibling temp file, then move it over the target.
    fn write_replacing(&self, text: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(text.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn names_netrc_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(NETRC_FILE_NAME))
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
