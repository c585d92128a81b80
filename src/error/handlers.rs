//! Error handlers
//!
//! Provides error reporting and exit code mapping.

use crate::error::types::{CommandError, StorageError};
use log::error;

/// Report a command error through the logging sink
pub fn handle_error(err: &CommandError) {
    error!("Storage command failed: {}", err);
}

/// Convert an error to a process exit status
pub fn error_to_exit_code(err: &CommandError) -> i32 {
    match err {
        CommandError::InvalidPath(_) => 2,
        CommandError::PermissionDenied(_) => 3,
        CommandError::Restricted(_) => 3,
        CommandError::Failed(_) => 1,
        CommandError::Storage(StorageError::Config(_)) => 78,
        CommandError::Storage(_) => 74,
    }
}
