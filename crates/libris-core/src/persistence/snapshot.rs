//! On-disk snapshot envelope

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};
use crate::library::Library;

/// Current snapshot format version
pub const FORMAT_VERSION: u32 = 1;

/// Versioned wrapper around a serialized library
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub library: Library,
}

impl Snapshot {
    pub fn to_json(library: &Library, pretty: bool) -> Result<String> {
        #[derive(Serialize)]
        struct SnapshotRef<'a> {
            format_version: u32,
            library: &'a Library,
        }

        let snapshot = SnapshotRef {
            format_version: FORMAT_VERSION,
            library,
        };
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }

    /// Parse a snapshot and restore derived state.
    ///
    /// The returned library has its ISBN index rebuilt, its counters synced,
    /// and has passed [`Library::check_invariants`].
    pub fn from_json(json: &str) -> Result<Library> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                expected: FORMAT_VERSION,
                actual: snapshot.format_version,
            }
            .into());
        }

        let mut library = snapshot.library;
        library.rebuild_isbn_index();
        library.sync_counters();
        library
            .check_invariants()
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        Ok(library)
    }
}
