//! File system storage management
//!
//! Handles path resolution, containment checks, permissions and the bulk
//! operations performed on the files tree.

pub mod archive;
pub mod filesystem;
pub mod local;
pub mod operations;
pub mod paths;
pub mod permissions;
pub mod results;
pub mod root;
pub mod validation;

// Re-export commonly used items
pub use filesystem::SizeProbe;
pub use local::LocalStorage;
pub use operations::MAX_DIRECTORY_DEPTH;
pub use permissions::PermissionChecker;
pub use results::DirSummary;
pub use root::{HostEnvironment, RootResolver};
