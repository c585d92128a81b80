//! File system operations
//!
//! Directory creation and exact file sizing.

use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::Path;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use crate::error::StorageError;

static CONTENT_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Content-Length: (\d+)").expect("constant pattern compiles"));

/// External capability able to report a file's length out of band.
///
/// The response is expected to carry a `Content-Length: <bytes>` line, the way
/// a HEAD-style request against a `file://` URL answers.
pub trait SizeProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Option<String>;
}

/// Create a directory and any missing parents (`rwxrwxr-x`)
pub fn create_directory(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o775);
    }

    builder.create(path)
}

/// Check if file exists
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Shared lock released when dropped
struct SharedLock<'a> {
    file: &'a File,
}

impl<'a> SharedLock<'a> {
    fn acquire(file: &'a File) -> io::Result<Self> {
        file.lock_shared()?;
        Ok(Self { file })
    }
}

impl Drop for SharedLock<'_> {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Exact size of `path` in bytes, correct well beyond 4 GiB.
///
/// The primary method seeks to the end of the file under a shared lock. If
/// that fails after the file was opened, the optional probe and then plain
/// metadata are consulted. Only a file that cannot be opened at all is an
/// error.
pub fn real_file_size(path: &Path, probe: Option<&dyn SizeProbe>) -> Result<u64, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let position = end_position(&file);
    drop(file);

    match position {
        Ok(size) => Ok(size),
        Err(e) => {
            warn!(
                "Seek-based size probe failed for {}: {}, falling back",
                path.display(),
                e
            );
            fallback_size(path, probe)
        }
    }
}

fn end_position(file: &File) -> io::Result<u64> {
    let _lock = SharedLock::acquire(file)?;
    let mut handle = file;
    handle.seek(SeekFrom::End(0))
}

fn fallback_size(path: &Path, probe: Option<&dyn SizeProbe>) -> Result<u64, StorageError> {
    if let Some(size) = probe
        .and_then(|probe| probe.probe(path))
        .and_then(|response| parse_content_length(&response))
    {
        return Ok(size);
    }

    Ok(fs::metadata(path)?.len())
}

/// Extract the byte count from a `Content-Length: <digits>` line
pub fn parse_content_length(response: &str) -> Option<u64> {
    CONTENT_LENGTH.captures(response)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(&'static str);

    impl SizeProbe for FixedProbe {
        fn probe(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_real_file_size_small_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, vec![0u8; 1234]).unwrap();
        assert_eq!(real_file_size(&path, None).unwrap(), 1234);
    }

    #[test]
    fn test_real_file_size_beyond_32_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sparse.bin");
        let file = File::create(&path).unwrap();
        file.set_len(5 * 1024 * 1024 * 1024).unwrap();
        drop(file);

        assert_eq!(real_file_size(&path, None).unwrap(), 5_368_709_120);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = real_file_size(&dir.path().join("missing"), None).unwrap_err();
        assert!(matches!(err, StorageError::OpenFailed { .. }));
    }

    #[test]
    fn test_fallback_prefers_probe_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"abc").unwrap();

        let probe = FixedProbe("HTTP/1.1 200 OK\r\nContent-Length: 5368709120\r\n\r\n");
        assert_eq!(fallback_size(&path, Some(&probe)).unwrap(), 5_368_709_120);
    }

    #[test]
    fn test_fallback_uses_metadata_without_usable_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"abc").unwrap();

        assert_eq!(fallback_size(&path, None).unwrap(), 3);
        let probe = FixedProbe("no length here");
        assert_eq!(fallback_size(&path, Some(&probe)).unwrap(), 3);
    }

    #[test]
    fn test_parse_content_length() {
        assert_eq!(parse_content_length("Content-Length: 42"), Some(42));
        assert_eq!(parse_content_length("Content-Length: x"), None);
        assert_eq!(parse_content_length("Content-Length: 99999999999999999999999"), None);
    }

    #[test]
    fn test_create_directory_is_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        create_directory(&nested).unwrap();
        assert!(directory_exists(&nested));
        assert!(!file_exists(&nested));
        // already present is fine
        create_directory(&nested).unwrap();
    }
}
