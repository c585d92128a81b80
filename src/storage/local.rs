//! Local storage
//!
//! `LocalStorage` ties the files root, the restriction policy and the
//! permission checks together and runs every bulk operation through them.
//! Callers build one per request from the shared settings.

use std::fmt::{self, Write as _};
use std::path::Path;
use std::sync::Arc;

use chrono::DateTime;
use log::info;

use crate::auth::{AccessAuthorizer, AllowAll};
use crate::config::Settings;
use crate::error::StorageError;
use crate::policy::PolicyEngine;
use crate::storage::archive;
use crate::storage::filesystem::{self, SizeProbe};
use crate::storage::operations;
use crate::storage::paths;
use crate::storage::permissions::PermissionChecker;
use crate::storage::results::DirSummary;
use crate::storage::root::{HostEnvironment, RootResolver};
use crate::storage::validation;

pub struct LocalStorage {
    settings: Settings,
    resolver: RootResolver,
    policy: PolicyEngine,
    permissions: PermissionChecker,
    size_probe: Option<Box<dyn SizeProbe>>,
}

impl LocalStorage {
    /// Storage whose authorization hook approves everything
    pub fn new(settings: Settings, host: &HostEnvironment) -> Self {
        Self::with_authorizer(settings, host, Arc::new(AllowAll))
    }

    pub fn with_authorizer(
        settings: Settings,
        host: &HostEnvironment,
        authorizer: Arc<dyn AccessAuthorizer>,
    ) -> Self {
        let resolver = RootResolver::new(&settings.options, host);
        let policy = PolicyEngine::from_config(&settings.security);
        let permissions = PermissionChecker::new(settings.security.read_only, authorizer);

        Self {
            settings,
            resolver,
            policy,
            permissions,
            size_probe: None,
        }
    }

    /// Install an out-of-band size probe used when seeking fails
    pub fn with_size_probe(mut self, probe: Box<dyn SizeProbe>) -> Self {
        self.size_probe = Some(probe);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ═══ ROOT ═══

    pub fn set_root(&mut self, path: &str, create_if_missing: bool) -> Result<(), StorageError> {
        self.resolver.set_root(path, create_if_missing)
    }

    pub fn root(&self) -> &str {
        self.resolver.root()
    }

    pub fn dynamic_root(&self) -> &str {
        self.resolver.dynamic_root()
    }

    pub fn full_path(&self, relative: &str) -> String {
        self.resolver.full_path(relative)
    }

    pub fn relative_path(&self, absolute: &str) -> String {
        self.resolver.relative_path(absolute)
    }

    pub fn dynamic_path(&self, absolute: &str) -> String {
        self.resolver.dynamic_path(absolute)
    }

    pub fn is_root_folder(&self, absolute: &str) -> bool {
        self.resolver.is_root_folder(absolute)
    }

    // ═══ GATES ═══

    /// Whether `path` resolves to the files root or somewhere beneath it
    pub fn is_valid_path(&self, path: &Path) -> bool {
        validation::is_within_root(self.resolver.root_path(), path)
    }

    pub fn is_allowed_extension(&self, path: &str) -> bool {
        self.policy.is_allowed_extension(path)
    }

    pub fn is_allowed_path(&self, path: &str) -> bool {
        self.policy.is_allowed_path(path)
    }

    pub fn has_system_read_permission(&self, path: &Path) -> bool {
        self.permissions.has_system_read_permission(path)
    }

    pub fn has_system_write_permission(&self, path: &Path) -> bool {
        self.permissions.has_system_write_permission(path)
    }

    pub fn has_read_permission(&self, path: &Path) -> bool {
        self.permissions.has_read_permission(path)
    }

    pub fn has_write_permission(&self, path: &Path) -> bool {
        self.permissions.has_write_permission(path)
    }

    // ═══ BULK OPERATIONS ═══

    /// Size, file count and folder count of everything readable and not
    /// restricted below `dir`
    pub fn dir_summary(&self, dir: &Path) -> DirSummary {
        operations::dir_summary(dir, &|path: &Path, is_dir: bool| {
            let mut relative = self.relative_path(&paths::clean(&path.to_string_lossy()));
            if is_dir {
                relative.push('/');
            }
            self.has_read_permission(path) && self.is_allowed_path(&relative)
        })
    }

    /// Total size of all visible files under the root
    pub fn root_total_size(&self) -> u64 {
        self.dir_summary(self.resolver.root_path()).size
    }

    pub fn unlink_recursive(&self, dir: &Path, delete_root_too: bool) {
        operations::unlink_recursive(dir, delete_root_too)
    }

    pub fn zip_path(&self, source: &Path, destination: &Path, include_parent_folder: bool) -> bool {
        archive::zip_path(source, destination, include_parent_folder)
    }

    pub fn real_file_size(&self, path: &Path) -> Result<u64, StorageError> {
        filesystem::real_file_size(path, self.size_probe.as_deref())
    }

    // ═══ HELPERS FOR COLLABORATORS ═══

    /// Format a unix timestamp with the configured date format (UTC)
    pub fn format_date(&self, timestamp: i64) -> Result<String, StorageError> {
        let format = &self.settings.options.date_format;
        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| StorageError::InvalidDateFormat(format!("timestamp {timestamp} out of range")))?;

        let mut formatted = String::new();
        write!(formatted, "{}", datetime.format(format))
            .map_err(|_| StorageError::InvalidDateFormat(format.clone()))?;
        Ok(formatted)
    }

    /// Decide whether a thumbnail of `image` may be written to `thumbnail`,
    /// creating the thumbnail folder when it is missing.
    ///
    /// Returns false when thumbnails are disabled, storage is read-only, the
    /// image is not readable or the thumbnail folder is not writable. Image
    /// processing itself belongs to the thumbnail pipeline.
    pub fn prepare_thumbnail_dir(&self, image: &Path, thumbnail: &Path) -> Result<bool, StorageError> {
        if !self.settings.images.thumbnail.enabled || self.permissions.is_read_only() {
            return Ok(false);
        }

        if !self.has_read_permission(image) {
            return Ok(false);
        }

        let Some(target) = thumbnail.parent() else {
            return Ok(false);
        };

        if !self.has_write_permission(target) {
            return Ok(false);
        }

        if !target.exists() {
            info!("creating thumbnail folder {}", target.display());
            filesystem::create_directory(target).map_err(|source| StorageError::CreateDirFailed {
                path: target.to_path_buf(),
                source,
            })?;
        }

        info!("generating thumbnail {}", thumbnail.display());
        Ok(true)
    }
}

impl fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorage")
            .field("resolver", &self.resolver)
            .field("policy", &self.policy)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
