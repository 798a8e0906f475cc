//! Service account key files.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{AuthError, Result};
use crate::source::KeySource;

/// A JSON service account key on disk.
///
/// The file is read on every call to [`KeySource::encoded_key`]; nothing is
/// cached.
#[derive(Debug, Clone)]
pub struct JsonKeyFile {
    path: PathBuf,
}

impl JsonKeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeySource for JsonKeyFile {
    fn encoded_key(&self) -> Result<String> {
        let data = std::fs::read(&self.path).map_err(|source| AuthError::KeyFileUnreadable {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), bytes = data.len(), "encoded key file");
        Ok(STANDARD.encode(data))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_file_contents() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/key.json");

        let key = JsonKeyFile::new(path).encoded_key().unwrap();
        assert_eq!(key, "ewogICAgInRlc3Qta2V5IjogInRlc3QtdmFsdWUiCn0=");
    }

    #[test]
    fn empty_file_encodes_to_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "").unwrap();

        assert_eq!(JsonKeyFile::new(&path).encoded_key().unwrap(), "");
    }

    #[test]
    fn missing_file_is_key_file_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-key.json");

        let err = JsonKeyFile::new(&path).encoded_key().unwrap_err();
        match err {
            AuthError::KeyFileUnreadable { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
