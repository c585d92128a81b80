use std::fs;
use std::path::Path;
use std::sync::Arc;

use rax_fm_storage::auth::FnAuthorizer;
use rax_fm_storage::storage::DirSummary;
use rax_fm_storage::{HostEnvironment, LocalStorage, Settings};
use tempfile::TempDir;

// Helper to setup a files root with a small tree
fn setup_test_env() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("userfiles");
    fs::create_dir_all(root.join("images/_thumbs")).unwrap();
    fs::write(root.join("readme.txt"), vec![b'r'; 10]).unwrap();
    fs::write(root.join("notes.txt"), vec![b'n'; 20]).unwrap();
    fs::write(root.join("images/cat.jpg"), vec![b'c'; 5]).unwrap();
    fs::write(root.join("images/_thumbs/cat.jpg"), vec![b't'; 3]).unwrap();
    dir
}

// Storage rooted at <document root>/userfiles
fn storage_for(dir: &TempDir, settings: Settings) -> LocalStorage {
    let mut settings = settings;
    settings.options.file_root = Some("userfiles".into());
    settings.options.server_root = true;
    let host = HostEnvironment::new(dir.path().to_string_lossy(), "");
    LocalStorage::new(settings, &host)
}

#[test]
fn test_root_resolution_under_document_root() {
    let dir = setup_test_env();
    let storage = storage_for(&dir, Settings::default());

    let expected = format!("{}/userfiles", dir.path().to_string_lossy());
    assert_eq!(storage.root(), expected);
    assert_eq!(storage.dynamic_root(), "/userfiles");

    let cat = storage.full_path("/images/cat.jpg");
    assert_eq!(storage.relative_path(&cat), "/images/cat.jpg");
    assert_eq!(storage.dynamic_path(&cat), "/userfiles/images/cat.jpg");
    assert!(storage.is_valid_path(Path::new(&cat)));
}

#[test]
fn test_summary_with_all_entries_permitted() {
    let dir = setup_test_env();
    let storage = storage_for(&dir, Settings::default());

    assert_eq!(
        storage.dir_summary(Path::new(storage.root())),
        DirSummary {
            size: 38,
            files: 4,
            folders: 2
        }
    );
}

#[test]
fn test_summary_skips_thumbnail_folder_pattern() {
    let dir = setup_test_env();
    let mut settings = Settings::default();
    settings.security.patterns.restrictions = vec!["_thumbs".into()];
    let storage = storage_for(&dir, settings);

    assert_eq!(
        storage.dir_summary(Path::new(storage.root())),
        DirSummary {
            size: 35,
            files: 3,
            folders: 1
        }
    );
    assert_eq!(storage.root_total_size(), 35);
}

#[test]
fn test_write_permission_layers() {
    let dir = setup_test_env();

    let storage = storage_for(&dir, Settings::default());
    let new_file = storage.full_path("/newdir/newfile.txt");
    assert!(storage.has_write_permission(Path::new(&new_file)));

    let mut settings = Settings::default();
    settings.security.read_only = true;
    let storage = storage_for(&dir, settings);
    assert!(!storage.has_write_permission(Path::new(&new_file)));
    assert!(storage.has_read_permission(Path::new(storage.root())));
}

#[test]
fn test_authorization_hook_is_consulted() {
    let dir = setup_test_env();
    let mut settings = Settings::default();
    settings.options.file_root = Some("userfiles".into());
    let host = HostEnvironment::new(dir.path().to_string_lossy(), "");
    let auth = FnAuthorizer::new(
        |path: &Path| !path.ends_with("notes.txt"),
        |path: &Path| !path.ends_with("images"),
    );
    let storage = LocalStorage::with_authorizer(settings, &host, Arc::new(auth));

    let notes = storage.full_path("/notes.txt");
    let images = storage.full_path("/images");
    assert!(!storage.has_read_permission(Path::new(&notes)));
    assert!(!storage.has_write_permission(Path::new(&images)));
    assert!(storage.has_write_permission(Path::new(&storage.full_path("/readme.txt"))));
    assert_eq!(storage.root_total_size(), 18);
}

#[test]
fn test_set_root_and_delete() {
    let dir = setup_test_env();
    let mut storage = storage_for(&dir, Settings::default());

    storage.set_root("tenants/acme", true).unwrap();
    let tenant_root = dir.path().join("tenants/acme");
    assert!(tenant_root.is_dir());
    assert_eq!(storage.dynamic_root(), "/tenants/acme");

    fs::create_dir_all(tenant_root.join("a/b")).unwrap();
    fs::write(tenant_root.join("a/b/c.txt"), b"c").unwrap();
    storage.unlink_recursive(&tenant_root.join("a"), true);
    assert!(!tenant_root.join("a").exists());
    assert!(tenant_root.exists());
}

#[cfg(feature = "archive")]
#[test]
fn test_zip_and_size_of_archive() {
    let dir = setup_test_env();
    let storage = storage_for(&dir, Settings::default());

    let source = storage.full_path("/images");
    let destination = dir.path().join("images.zip");
    assert!(storage.zip_path(Path::new(&source), &destination, true));

    let archive = zip::ZipArchive::new(fs::File::open(&destination).unwrap()).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert!(names.contains(&"images/cat.jpg"));
    assert!(names.contains(&"images/_thumbs/"));
    assert!(names.contains(&"images/_thumbs/cat.jpg"));

    let size = storage.real_file_size(&destination).unwrap();
    assert_eq!(size, fs::metadata(&destination).unwrap().len());
}
