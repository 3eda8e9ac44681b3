//! JSON file backend.
//!
//! Writes the whole table set to a temporary file, syncs it, and renames it
//! over the store, so a crash leaves either the old or the new snapshot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{Backend, Tables};
use crate::error::{Result, StoreError};

/// Stores tables as pretty-printed JSON at `path`.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Backend for JsonFile {
    fn load(&self) -> Result<Tables> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file missing, starting empty");
            return Ok(Tables::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let tables = serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(tables)
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let contents = serde_json::to_string_pretty(tables)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| self.write_error(e))?;

        // Sealed secrets are safe at rest, but labels and addresses are not public.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.write_error(e))?;
        }

        file.write_all(contents.as_bytes())
            .map_err(|e| self.write_error(e))?;
        file.sync_all().map_err(|e| self.write_error(e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;

        trace!(path = %self.path.display(), bytes = contents.len(), "store persisted");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
