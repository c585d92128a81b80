//! Authorization hook
//!
//! The surrounding application decides whether the current actor may read or
//! write a given absolute path. The storage layer only asks.

use std::fmt;
use std::path::Path;

/// Read/write authorization callbacks supplied by the application
pub trait AccessAuthorizer: Send + Sync {
    fn can_read(&self, path: &Path) -> bool;
    fn can_write(&self, path: &Path) -> bool;
}

/// Authorizer that approves everything; system permissions and policy still apply
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AccessAuthorizer for AllowAll {
    fn can_read(&self, _path: &Path) -> bool {
        true
    }

    fn can_write(&self, _path: &Path) -> bool {
        true
    }
}

/// Adapter turning a pair of closures into an authorizer
pub struct FnAuthorizer<R, W> {
    read: R,
    write: W,
}

impl<R, W> FnAuthorizer<R, W>
where
    R: Fn(&Path) -> bool + Send + Sync,
    W: Fn(&Path) -> bool + Send + Sync,
{
    pub fn new(read: R, write: W) -> Self {
        Self { read, write }
    }
}

impl<R, W> AccessAuthorizer for FnAuthorizer<R, W>
where
    R: Fn(&Path) -> bool + Send + Sync,
    W: Fn(&Path) -> bool + Send + Sync,
{
    fn can_read(&self, path: &Path) -> bool {
        (self.read)(path)
    }

    fn can_write(&self, path: &Path) -> bool {
        (self.write)(path)
    }
}

impl<R, W> fmt::Debug for FnAuthorizer<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAuthorizer").finish_non_exhaustive()
    }
}
