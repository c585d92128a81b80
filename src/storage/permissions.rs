//! File permissions
//!
//! Layers operating-system permission checks, the global read-only switch and
//! the application's authorization hook into read/write decisions. A denial is
//! a normal `false`, never an error.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::auth::AccessAuthorizer;

/// Check if the current process may read `path`
#[cfg(unix)]
pub fn is_readable(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};
    access(path, AccessFlags::R_OK).is_ok()
}

/// Check if the current process may read `path`
#[cfg(not(unix))]
pub fn is_readable(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::read_dir(path).is_ok(),
        Ok(_) => std::fs::File::open(path).is_ok(),
        Err(_) => false,
    }
}

/// Check if the current process may write `path`.
///
/// Creating an entry inside a POSIX directory needs both write and execute.
#[cfg(unix)]
pub fn is_writable(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    let mode = if path.is_dir() {
        AccessFlags::W_OK | AccessFlags::X_OK
    } else {
        AccessFlags::W_OK
    };
    access(path, mode).is_ok()
}

/// Check if the current process may write `path`
#[cfg(not(unix))]
pub fn is_writable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Unified read/write permission checks
#[derive(Clone)]
pub struct PermissionChecker {
    read_only: bool,
    authorizer: Arc<dyn AccessAuthorizer>,
}

impl PermissionChecker {
    pub fn new(read_only: bool, authorizer: Arc<dyn AccessAuthorizer>) -> Self {
        Self {
            read_only,
            authorizer,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn has_system_read_permission(&self, path: &Path) -> bool {
        is_readable(path)
    }

    pub fn has_system_write_permission(&self, path: &Path) -> bool {
        is_writable(path)
    }

    /// System readability plus the authorization hook
    pub fn has_read_permission(&self, path: &Path) -> bool {
        if !self.has_system_read_permission(path) {
            debug!("No system read permission for {}", path.display());
            return false;
        }

        self.authorizer.can_read(path)
    }

    /// Write permission for an existing path, or for creating a missing one.
    ///
    /// A missing path is governed by its nearest existing ancestor.
    pub fn has_write_permission(&self, path: &Path) -> bool {
        if !path.exists() {
            return match path.parent() {
                Some(parent) if parent != path => self.has_write_permission(parent),
                _ => false,
            };
        }

        if !self.has_system_write_permission(path) {
            debug!("No system write permission for {}", path.display());
            return false;
        }

        if self.read_only {
            return false;
        }

        self.authorizer.can_write(path)
    }
}

impl fmt::Debug for PermissionChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionChecker")
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}
