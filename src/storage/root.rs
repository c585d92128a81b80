//! Files root resolution
//!
//! Computes the directory that backs every storage operation and its public
//! counterpart relative to the hosting document root.

use std::env;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::OptionsConfig;
use crate::error::StorageError;
use crate::storage::filesystem;
use crate::storage::paths;

/// Folder used when no explicit files root is configured
pub const DEFAULT_FILES_FOLDER: &str = "userfiles";

/// Values supplied by the hosting environment
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    /// Public document root of the web server
    pub document_root: String,
    /// Path of the entry script or executable
    pub script_filename: String,
}

impl HostEnvironment {
    pub fn new(document_root: impl Into<String>, script_filename: impl Into<String>) -> Self {
        Self {
            document_root: document_root.into(),
            script_filename: script_filename.into(),
        }
    }

    /// Read `DOCUMENT_ROOT` and `SCRIPT_FILENAME`, falling back to the current
    /// directory and the running executable
    pub fn from_env() -> Self {
        let document_root = non_empty_var("DOCUMENT_ROOT")
            .or_else(|| env::current_dir().ok().map(display_path))
            .unwrap_or_default();
        let script_filename = non_empty_var("SCRIPT_FILENAME")
            .or_else(|| env::current_exe().ok().map(display_path))
            .unwrap_or_default();

        Self {
            document_root,
            script_filename,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn display_path(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn normalize_root(path: &str) -> String {
    paths::trim_trailing(&paths::clean(path)).to_string()
}

/// Resolved files root and its public counterpart
#[derive(Debug, Clone)]
pub struct RootResolver {
    root: String,
    dynamic_root: String,
    document_root: String,
    server_root: bool,
}

impl RootResolver {
    pub fn new(options: &OptionsConfig, host: &HostEnvironment) -> Self {
        let (document_root, root) = match options.file_root_override() {
            // the override is a suffix of the document root
            Some(file_root) if options.server_root => (
                host.document_root.clone(),
                format!("{}/{}", host.document_root, file_root),
            ),
            // the override is a standalone path
            Some(file_root) => (file_root.to_string(), file_root.to_string()),
            None => {
                let base = Path::new(&host.script_filename)
                    .ancestors()
                    .nth(3)
                    .map(|dir| dir.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (
                    host.document_root.clone(),
                    format!("{}/{}", base, DEFAULT_FILES_FOLDER),
                )
            }
        };

        let document_root = normalize_root(&document_root);
        let root = normalize_root(&root);
        let dynamic_root = paths::to_relative(&root, &document_root);

        info!("path to files: {:?}", root);
        info!("document root: {:?}", document_root);
        info!("dynamic files root: {:?}", dynamic_root);

        Self {
            root,
            dynamic_root,
            document_root,
            server_root: options.server_root,
        }
    }

    /// Replace the files root, optionally creating the folder.
    ///
    /// `path` is interpreted the same way as the configured override.
    pub fn set_root(&mut self, path: &str, create_if_missing: bool) -> Result<(), StorageError> {
        if self.server_root {
            self.root = normalize_root(&format!("{}/{}", self.document_root, path));
        } else {
            self.root = normalize_root(path);
            self.document_root = self.root.clone();
        }
        self.dynamic_root = paths::to_relative(&self.root, &self.document_root);

        info!("Files root overwritten with set_root():");
        info!("path to files: {:?}", self.root);
        info!("dynamic files root: {:?}", self.dynamic_root);

        let root = self.root_path();
        if create_if_missing && !root.exists() {
            info!("creating {:?} folder", self.root);
            filesystem::create_directory(root).map_err(|source| StorageError::CreateDirFailed {
                path: root.to_path_buf(),
                source,
            })?;
        }

        Ok(())
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn root_path(&self) -> &Path {
        Path::new(&self.root)
    }

    pub fn dynamic_root(&self) -> &str {
        &self.dynamic_root
    }

    pub fn document_root(&self) -> &str {
        &self.document_root
    }

    /// Absolute path of a root-relative path
    pub fn full_path(&self, relative: &str) -> String {
        paths::clean(&format!("{}/{}", self.root, relative))
    }

    /// Root-relative form of an absolute path; empty when outside the root
    pub fn relative_path(&self, absolute: &str) -> String {
        paths::to_relative(absolute, &self.root)
    }

    /// Public path of an absolute path
    pub fn dynamic_path(&self, absolute: &str) -> String {
        paths::to_dynamic(absolute, &self.dynamic_root, &self.root)
    }

    pub fn is_root_folder(&self, absolute: &str) -> bool {
        paths::is_root_folder(absolute, &self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(file_root: Option<&str>, server_root: bool) -> OptionsConfig {
        OptionsConfig {
            file_root: file_root.map(String::from),
            server_root,
            ..OptionsConfig::default()
        }
    }

    fn host() -> HostEnvironment {
        HostEnvironment::new("/var/www/", "/var/www/filemanager/connectors/local/entry")
    }

    #[test]
    fn test_default_root_next_to_application() {
        let resolver = RootResolver::new(&options(None, true), &host());
        assert_eq!(resolver.root(), "/var/www/filemanager/userfiles");
        assert_eq!(resolver.document_root(), "/var/www");
        assert_eq!(resolver.dynamic_root(), "/filemanager/userfiles");
    }

    #[test]
    fn test_override_under_document_root() {
        let resolver = RootResolver::new(&options(Some("/uploads//"), true), &host());
        assert_eq!(resolver.root(), "/var/www/uploads");
        assert_eq!(resolver.dynamic_root(), "/uploads");
    }

    #[test]
    fn test_standalone_override() {
        let resolver = RootResolver::new(&options(Some("D:\\data\\files"), false), &host());
        assert_eq!(resolver.root(), "D:/data/files");
        assert_eq!(resolver.dynamic_root(), "");
    }

    #[test]
    fn test_path_translation() {
        let resolver = RootResolver::new(&options(Some("userfiles"), true), &host());

        assert_eq!(resolver.full_path("/img//a.png"), "/var/www/userfiles/img/a.png");
        assert_eq!(resolver.relative_path("/var/www/userfiles/img/a.png"), "/img/a.png");
        assert_eq!(resolver.relative_path("/var/www/userfiles2/a.png"), "");
        assert_eq!(
            resolver.dynamic_path("/var/www/userfiles/img/a.png"),
            "/userfiles/img/a.png"
        );
        assert!(resolver.is_root_folder("/var/www/userfiles/"));
    }

    #[test]
    fn test_relative_then_full_path_round_trip() {
        let resolver = RootResolver::new(&options(Some("/srv/files"), false), &host());
        for absolute in ["/srv/files/a", "/srv/files/a/b/c.txt", "/srv/files/.hidden"] {
            let relative = resolver.relative_path(absolute);
            assert_eq!(resolver.full_path(&relative), absolute);
        }
    }

    #[test]
    fn test_set_root_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = RootResolver::new(&options(Some("/unused"), false), &host());

        let target = dir.path().join("a/b/files");
        resolver.set_root(target.to_str().unwrap(), true).unwrap();

        assert!(target.is_dir());
        assert_eq!(resolver.root_path(), target.as_path());
        assert_eq!(resolver.dynamic_root(), "");
    }

    #[test]
    fn test_set_root_under_document_root_without_create() {
        let mut resolver = RootResolver::new(&options(None, true), &host());
        resolver.set_root("tenant-7", false).unwrap();
        assert_eq!(resolver.root(), "/var/www/tenant-7");
        assert_eq!(resolver.dynamic_root(), "/tenant-7");
    }

    #[cfg(unix)]
    #[test]
    fn test_set_root_reports_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let mut resolver = RootResolver::new(&options(Some("/unused"), false), &host());
        let err = resolver
            .set_root(blocker.join("sub").to_str().unwrap(), true)
            .unwrap_err();
        assert!(matches!(err, StorageError::CreateDirFailed { .. }));
    }
}
