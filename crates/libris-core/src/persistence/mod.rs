//! Persistence layer for library state
//!
//! Stores the whole [`Library`](crate::Library) as one JSON snapshot file.

mod snapshot;
mod storage;

pub use snapshot::{Snapshot, FORMAT_VERSION};
pub use storage::LibraryStorage;
