use crate::commands::parser::Command;
use crate::error::{CommandError, StorageError};
use crate::storage::LocalStorage;
use crate::storage::filesystem::{directory_exists, file_exists};
use crate::utils::validation::{is_valid_input, sanitize_input};

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

// Resolve a root-relative path from the caller, refusing anything outside the root
fn resolve_existing(storage: &LocalStorage, relative: &str) -> Result<(PathBuf, String), CommandError> {
    let (path, relative) = resolve(storage, relative)?;

    if !storage.is_valid_path(&path) {
        return Err(CommandError::InvalidPath(relative));
    }

    Ok((path, relative))
}

fn resolve(storage: &LocalStorage, relative: &str) -> Result<(PathBuf, String), CommandError> {
    if !is_valid_input(relative) {
        return Err(CommandError::InvalidPath(relative.to_string()));
    }

    let full = storage.full_path(&sanitize_input(relative));
    let relative = storage.relative_path(&full);

    if !storage.is_root_folder(&full) && !storage.is_allowed_path(&relative) {
        return Err(CommandError::Restricted(relative));
    }

    Ok((PathBuf::from(full), relative))
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

// Whether a path names the files root once links and dot segments are resolved
fn is_files_root(storage: &LocalStorage, path: &Path) -> bool {
    match (path.canonicalize(), Path::new(storage.root()).canonicalize()) {
        (Ok(path), Ok(root)) => path == root,
        _ => storage.is_root_folder(&path.to_string_lossy()),
    }
}

fn display_relative(relative: &str) -> &str {
    if relative.is_empty() { "/" } else { relative }
}

// Execute a single command against the storage
pub fn execute(storage: &LocalStorage, command: Command) -> Result<String, CommandError> {
    match command {
        Command::Root => Ok(handle_cmd_root(storage)),
        Command::Summary(path) => handle_cmd_summary(storage, path.as_deref().unwrap_or("/")),
        Command::Size(path) => handle_cmd_size(storage, &path),
        Command::Zip {
            source,
            destination,
            include_folder,
        } => handle_cmd_zip(storage, &source, &destination, include_folder),
        Command::Delete(path) => handle_cmd_delete(storage, &path),
        Command::Check(path) => handle_cmd_check(storage, &path),
        Command::Unknown(cmd) => Err(CommandError::Failed(format!("Unknown command: {cmd}"))),
    }
}

// Command handler for ROOT
fn handle_cmd_root(storage: &LocalStorage) -> String {
    format!(
        "root: {}\ndynamic root: {}",
        storage.root(),
        storage.dynamic_root()
    )
}

// Command handler for SUMMARY
fn handle_cmd_summary(storage: &LocalStorage, relative: &str) -> Result<String, CommandError> {
    let (path, relative) = resolve_existing(storage, relative)?;

    if !directory_exists(&path) {
        return Err(CommandError::Failed(format!(
            "Not a directory: {}",
            display_relative(&relative)
        )));
    }
    if !storage.has_read_permission(&path) {
        return Err(CommandError::PermissionDenied(relative));
    }

    let summary = storage.dir_summary(&path);
    Ok(format!(
        "size: {}\nfiles: {}\nfolders: {}",
        summary.size, summary.files, summary.folders
    ))
}

// Command handler for SIZE
fn handle_cmd_size(storage: &LocalStorage, relative: &str) -> Result<String, CommandError> {
    let (path, relative) = resolve_existing(storage, relative)?;

    if !file_exists(&path) {
        return Err(CommandError::Failed(format!("Not a file: {relative}")));
    }
    if !storage.is_allowed_extension(&relative) {
        return Err(CommandError::Restricted(relative));
    }
    if !storage.has_read_permission(&path) {
        return Err(CommandError::PermissionDenied(relative));
    }

    let size = storage.real_file_size(&path)?;
    Ok(size.to_string())
}

// Command handler for ZIP
fn handle_cmd_zip(
    storage: &LocalStorage,
    source: &str,
    destination: &str,
    include_folder: bool,
) -> Result<String, CommandError> {
    let (source_path, source_relative) = resolve_existing(storage, source)?;
    if !storage.has_read_permission(&source_path) {
        return Err(CommandError::PermissionDenied(source_relative));
    }

    let (destination_path, destination_relative) = resolve(storage, destination)?;
    let destination_parent = destination_path.parent().unwrap_or(Path::new("/"));
    if destination_relative.is_empty() || !storage.is_valid_path(destination_parent) {
        return Err(CommandError::InvalidPath(destination.to_string()));
    }
    if is_symlink(&destination_path)
        || (destination_path.exists() && !storage.is_valid_path(&destination_path))
    {
        return Err(CommandError::InvalidPath(destination_relative));
    }
    if !storage.has_write_permission(&destination_path) {
        return Err(CommandError::PermissionDenied(destination_relative));
    }

    if !storage.zip_path(&source_path, &destination_path, include_folder) {
        return Err(CommandError::Failed(format!(
            "Cannot archive {}",
            display_relative(&source_relative)
        )));
    }

    info!(
        "Archived {} into {}",
        display_relative(&source_relative),
        destination_relative
    );
    Ok(destination_relative)
}

// Command handler for DELETE
fn handle_cmd_delete(storage: &LocalStorage, relative: &str) -> Result<String, CommandError> {
    let (path, relative) = resolve_existing(storage, relative)?;

    if is_files_root(storage, &path) {
        return Err(CommandError::PermissionDenied("/".to_string()));
    }
    if !storage.has_write_permission(&path) {
        return Err(CommandError::PermissionDenied(relative));
    }

    // a link is removed itself, never the folder it points to
    if is_symlink(&path) {
        fs::remove_file(&path).map_err(StorageError::from)?;
    } else {
        let target = path.canonicalize().map_err(StorageError::from)?;
        if directory_exists(&target) {
            storage.unlink_recursive(&target, true);
        } else {
            fs::remove_file(&target).map_err(StorageError::from)?;
        }
    }

    if fs::symlink_metadata(&path).is_ok() {
        return Err(CommandError::Failed(format!("Could not fully delete {relative}")));
    }

    info!("Deleted {}", relative);
    Ok(relative)
}

// Command handler for CHECK
fn handle_cmd_check(storage: &LocalStorage, relative: &str) -> Result<String, CommandError> {
    if !is_valid_input(relative) {
        return Err(CommandError::InvalidPath(relative.to_string()));
    }

    let full = storage.full_path(&sanitize_input(relative));
    let path = Path::new(&full);
    let relative = storage.relative_path(&full);

    Ok(format!(
        "path: {}\nvalid: {}\nreadable: {}\nwritable: {}\nextension allowed: {}\npath allowed: {}",
        full,
        storage.is_valid_path(path),
        storage.has_read_permission(path),
        storage.has_write_permission(path),
        storage.is_allowed_extension(&relative),
        storage.is_allowed_path(&relative),
    ))
}
