//! Libris Core - catalogue, membership, and loan bookkeeping
//!
//! This crate provides the domain model for the libris library manager:
//!
//! - **Book**: Catalogue entries keyed by id and by normalized ISBN
//! - **Member**: Students and professors with role-based borrow limits
//! - **Loan**: Records of active borrows with due dates
//! - **Library**: The registry that owns all of the above and enforces invariants
//! - **Persistence**: Whole-state JSON snapshots with atomic saves
//! - **Config**: Storage and logging settings
//!
//! # Borrowing rules
//!
//! ```text
//! Role       Max books   Loan period
//! Student        3         14 days
//! Professor      5         28 days
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod isbn;
pub mod library;
pub mod loan;
pub mod member;
pub mod persistence;
mod validation;

pub use book::{Book, BookId, BookRef, NewBook};
pub use config::{LibrisConfig, LoggingConfig, StorageConfig};
pub use error::{ConfigError, ErrorKind, LibraryError, PersistenceError, Result};
pub use isbn::{is_valid_isbn, normalize_isbn};
pub use library::Library;
pub use loan::LoanRecord;
pub use member::{Member, MemberId, Role};
pub use persistence::{LibraryStorage, Snapshot};

/// Returns the version of libris-core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
