//! File-backed storage for the library snapshot

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::snapshot::Snapshot;
use crate::config::StorageConfig;
use crate::error::{PersistenceError, Result};
use crate::library::Library;

/// Loads and saves the library from a single snapshot file
#[derive(Debug, Clone)]
pub struct LibraryStorage {
    path: PathBuf,
    pretty: bool,
}

impl LibraryStorage {
    /// Create storage backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: true,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            pretty: config.pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the library, falling back to an empty one.
    ///
    /// A missing file is the normal first-run case. An unreadable, unparsable,
    /// or inconsistent file is logged and treated as empty; it is left on disk
    /// untouched until the next save overwrites it.
    pub fn load_or_create(&self) -> Library {
        if !self.path.exists() {
            tracing::info!("No library data at {:?}, starting empty", self.path);
            return Library::new();
        }
        match self.load() {
            Ok(library) => {
                tracing::info!(
                    books = library.book_count(),
                    members = library.member_count(),
                    loans = library.loans().len(),
                    "Loaded library from {:?}",
                    self.path
                );
                library
            }
            Err(e) => {
                tracing::warn!("Failed to load library from {:?}: {}", self.path, e);
                Library::new()
            }
        }
    }

    /// Load the library, propagating every failure
    pub fn load(&self) -> Result<Library> {
        let json = fs::read_to_string(&self.path).map_err(PersistenceError::from)?;
        Snapshot::from_json(&json)
    }

    /// Write the full library state.
    ///
    /// The snapshot goes to a sibling temp file which is synced and then
    /// renamed over the target, so an interrupted save leaves the previous
    /// file intact.
    pub fn save(&self, library: &Library) -> Result<()> {
        let json = Snapshot::to_json(library, self.pretty)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(PersistenceError::from)?;
            }
        }

        let temp_path = self.temp_path();
        if let Err(e) = Self::replace_file(&temp_path, &self.path, json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(PersistenceError::from(e).into());
        }

        tracing::debug!("Saved library to {:?}", self.path);
        Ok(())
    }

    fn replace_file(temp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(temp_path, target)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "library.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
