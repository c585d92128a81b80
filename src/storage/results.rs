//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::ops::Add;

/// Totals gathered by a recursive directory walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirSummary {
    pub size: u64,
    pub files: u64,
    pub folders: u64,
}

impl DirSummary {
    /// Summary of a single file
    pub fn file(size: u64) -> Self {
        Self {
            size,
            files: 1,
            folders: 0,
        }
    }

    /// Summary of a folder entry together with its contents
    pub fn folder(contents: DirSummary) -> Self {
        Self {
            folders: 1,
            ..DirSummary::default()
        }
        .merge(contents)
    }

    /// Combine two summaries
    pub fn merge(self, other: DirSummary) -> Self {
        Self {
            size: self.size.saturating_add(other.size),
            files: self.files + other.files,
            folders: self.folders + other.folders,
        }
    }
}

impl Add for DirSummary {
    type Output = DirSummary;

    fn add(self, other: DirSummary) -> DirSummary {
        self.merge(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_counts_itself() {
        let summary = DirSummary::folder(DirSummary::file(5) + DirSummary::file(7));
        assert_eq!(
            summary,
            DirSummary {
                size: 12,
                files: 2,
                folders: 1
            }
        );
    }

    #[test]
    fn test_merge_saturates_size() {
        let big = DirSummary::file(u64::MAX);
        assert_eq!((big + DirSummary::file(1)).size, u64::MAX);
    }
}
