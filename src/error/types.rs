//! Error types
//!
//! Defines the typed failures of the storage layer. Policy, permission and
//! containment decisions are plain booleans and never appear here; only
//! genuinely exceptional I/O and configuration problems do.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file could not be opened at all for size probing
    #[error("Cannot open {} for reading: {source}", .path.display())]
    OpenFailed { path: PathBuf, source: io::Error },

    /// A directory explicitly requested by the caller could not be created
    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by the command-line front end
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Restricted by policy: {0}")]
    Restricted(String),

    #[error("Operation failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
