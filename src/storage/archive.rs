//! Zip packaging
//!
//! Packs a file or a whole directory tree into a zip archive. Archive support
//! is behind the `archive` feature; without it packaging reports failure.

use std::path::Path;

use log::warn;

/// Name of the text entry added to every directory archive
pub const PLACEHOLDER_ENTRY: &str = "archive.txt";

#[cfg(feature = "archive")]
const PLACEHOLDER_TEXT: &str = "This archive has been generated by the file manager.\n";

/// Pack `source` into a fresh archive at `destination`.
///
/// Entry names are relative to `source`, prefixed with its own name when
/// `include_parent_folder` is set. Returns true iff the archive was written
/// and closed successfully.
#[cfg(feature = "archive")]
pub fn zip_path(source: &Path, destination: &Path, include_parent_folder: bool) -> bool {
    if !source.exists() {
        return false;
    }

    match write_archive(source, destination, include_parent_folder) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to archive {} into {}: {}",
                source.display(),
                destination.display(),
                e
            );
            false
        }
    }
}

#[cfg(not(feature = "archive"))]
pub fn zip_path(source: &Path, _destination: &Path, _include_parent_folder: bool) -> bool {
    warn!(
        "Cannot archive {}: archive support is not compiled in",
        source.display()
    );
    false
}

/// Entries at or beyond this length need zip64 headers
#[cfg(feature = "archive")]
const LARGE_ENTRY_THRESHOLD: u64 = u32::MAX as u64;

#[cfg(feature = "archive")]
fn needs_large_file(len: u64) -> bool {
    len >= LARGE_ENTRY_THRESHOLD
}

/// Write the archive, removing the partly written file when anything fails
#[cfg(feature = "archive")]
fn write_archive(
    source: &Path,
    destination: &Path,
    include_parent_folder: bool,
) -> zip::result::ZipResult<()> {
    use std::fs::File;

    use zip::ZipWriter;

    let source = source.canonicalize()?;
    let file = File::create(destination)?;
    let canonical_destination = destination.canonicalize().ok();

    let result = fill_archive(
        ZipWriter::new(file),
        &source,
        canonical_destination.as_deref(),
        include_parent_folder,
    );
    discard_on_error(result, destination)
}

#[cfg(feature = "archive")]
fn discard_on_error<T>(
    result: zip::result::ZipResult<T>,
    destination: &Path,
) -> zip::result::ZipResult<T> {
    if result.is_err() {
        let _ = std::fs::remove_file(destination);
    }
    result
}

#[cfg(feature = "archive")]
fn fill_archive(
    mut zip: zip::ZipWriter<std::fs::File>,
    source: &Path,
    destination: Option<&Path>,
    include_parent_folder: bool,
) -> zip::result::ZipResult<()> {
    use std::fs;
    use std::io::Write;

    use log::debug;
    use walkdir::WalkDir;
    use zip::write::SimpleFileOptions;

    let source_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = if include_parent_folder && !source_name.is_empty() {
        format!("{source_name}/")
    } else {
        String::new()
    };

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    if source.is_dir() {
        // a top-level file of the same name replaces the placeholder
        let shadowed = prefix.is_empty() && {
            let own = source.join(PLACEHOLDER_ENTRY);
            destination != Some(own.as_path())
                && fs::symlink_metadata(&own).is_ok_and(|meta| meta.is_file())
        };
        if !shadowed {
            // keeps readers from rejecting an archive of an empty folder
            zip.start_file(PLACEHOLDER_ENTRY, options)?;
            zip.write_all(PLACEHOLDER_TEXT.as_bytes())?;
        }

        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry while archiving: {}", e);
                    continue;
                }
            };

            if destination == Some(entry.path()) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(source) else {
                continue;
            };
            let name = format!(
                "{}{}",
                prefix,
                crate::storage::paths::clean(&relative.to_string_lossy())
            );

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{name}/"), options)?;
            } else if entry.file_type().is_file() {
                copy_entry(&mut zip, entry.path(), name, options)?;
            }
        }
    } else if source.is_file() {
        copy_entry(&mut zip, source, format!("{prefix}{source_name}"), options)?;
    }

    zip.finish()?;
    Ok(())
}

#[cfg(feature = "archive")]
fn copy_entry(
    zip: &mut zip::ZipWriter<std::fs::File>,
    path: &Path,
    name: String,
    options: zip::write::SimpleFileOptions,
) -> zip::result::ZipResult<()> {
    use std::fs::File;
    use std::io;

    let mut input = File::open(path)?;
    let len = input.metadata()?.len();
    zip.start_file(name, options.large_file(needs_large_file(len)))?;
    io::copy(&mut input, zip)?;
    Ok(())
}
