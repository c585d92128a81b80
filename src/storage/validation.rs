//! Path validation
//!
//! Confirms that a path really lives under the files root once symlinks and
//! `..` segments are resolved.

use std::path::Path;

use log::info;

/// Check that `path` is `root` itself or lies beneath it.
///
/// Both sides are canonicalized, so symlinks pointing outside the root and
/// `..` escapes are rejected. A path that cannot be resolved (for example
/// because it does not exist) is rejected too. Rejections are logged.
pub fn is_within_root(root: &Path, path: &Path) -> bool {
    let canonical_root = match root.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            info!("Files root {} cannot be resolved: {}", root.display(), e);
            return false;
        }
    };

    let canonical_path = match path.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            info!("Invalid path {}: {}", path.display(), e);
            return false;
        }
    };

    // component-wise, so `/srv/files2` is not inside `/srv/files`
    let contained = canonical_path.starts_with(&canonical_root);

    if !contained {
        info!("Invalid path {}", path.display());
        info!("real path: {}", canonical_path.display());
        info!("path to files: {}", canonical_root.display());
    }

    contained
}
