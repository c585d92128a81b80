//! Storage operations
//!
//! Recursive traversals over the files tree: folder summaries and recursive
//! deletion. Both tolerate partial failure; an entry that cannot be read,
//! vanishes mid-walk or is refused by the caller's gate is skipped rather than
//! aborting the whole walk.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::storage::results::DirSummary;

/// Maximum nesting followed by a summary walk; bounds symlink cycles
pub const MAX_DIRECTORY_DEPTH: usize = 64;

/// Summarize the permitted contents of `dir`.
///
/// `is_visible(path, is_dir)` decides whether an entry takes part; a permitted
/// folder counts itself and its permitted contents, a permitted file counts its
/// size. A listing failure yields an empty summary for that folder.
pub fn dir_summary<F>(dir: &Path, is_visible: &F) -> DirSummary
where
    F: Fn(&Path, bool) -> bool,
{
    summarize(dir, is_visible, 0)
}

fn summarize<F>(dir: &Path, is_visible: &F, depth: usize) -> DirSummary
where
    F: Fn(&Path, bool) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            return DirSummary::default();
        }
    };

    entries.flatten().fold(DirSummary::default(), |total, entry| {
        let path = entry.path();

        // follows symlinks; broken links and vanished entries drop out here
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                return total;
            }
        };

        let is_dir = metadata.is_dir();
        if !is_visible(&path, is_dir) {
            return total;
        }

        if !is_dir {
            return total + DirSummary::file(metadata.len());
        }

        if depth + 1 >= MAX_DIRECTORY_DEPTH {
            warn!("Not descending into {}: nesting too deep", path.display());
            return total + DirSummary::folder(DirSummary::default());
        }

        total + DirSummary::folder(summarize(&path, is_visible, depth + 1))
    })
}

/// Delete the contents of `dir`, leaves first, and `dir` itself when
/// `delete_root_too` is set.
///
/// Failures are swallowed: a folder that cannot be opened is left alone and
/// a folder that cannot be removed stays behind.
pub fn unlink_recursive(dir: &Path, delete_root_too: bool) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if fs::remove_file(&path).is_err() {
            unlink_recursive(&path, true);
        }
    }

    if delete_root_too {
        if let Err(e) = fs::remove_dir(dir) {
            debug!("Failed to remove {}: {}", dir.display(), e);
        }
    }
}
