//! Error types for libris-core

use thiserror::Error;

/// Result type alias for libris operations
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for catalogue, membership, and loan operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Malformed, blank, or negative input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced id or ISBN does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// ISBN collision on create or update
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Operation would break a business rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal invariant violation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Coarse classification of a [`LibraryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    DuplicateKey,
    Conflict,
    InvalidState,
    Persistence,
}

impl LibraryError {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            LibraryError::NotFound(_) => ErrorKind::NotFound,
            LibraryError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            LibraryError::Conflict(_) => ErrorKind::Conflict,
            LibraryError::InvalidState(_) => ErrorKind::InvalidState,
            LibraryError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

/// Persistence-specific errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot written by an unknown format version
    #[error("Unsupported format version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    /// Snapshot parsed but its contents break library invariants
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::Persistence(PersistenceError::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::Persistence(PersistenceError::Serialization(err.to_string()))
    }
}

/// Configuration loading and validation error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Config file is not valid TOML for this schema
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// Value is out of valid range
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
