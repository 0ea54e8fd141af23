use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

fn scratch_path(name: &str) -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("clinic-auth-storage-{}-{n}", std::process::id()))
        .join(name)
}

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_get_missing_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("jwtToken").is_none());
}

#[test]
fn memory_set_overwrites() {
    let store = MemoryStore::new();
    store.set("jwtToken", "a").unwrap();
    store.set("jwtToken", "b").unwrap();
    assert_eq!(store.get("jwtToken").as_deref(), Some("b"));
}

#[test]
fn memory_remove_missing_is_ok() {
    let store = MemoryStore::new();
    assert!(store.remove("nope").is_ok());
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn file_store_missing_file_opens_empty() {
    let store = FileStore::open(scratch_path("absent.json")).unwrap();
    assert!(store.get("jwtToken").is_none());
}

#[test]
fn file_store_survives_reopen() {
    let path = scratch_path("storage.json");
    {
        let store = FileStore::open(&path).unwrap();
        store.set("jwtToken", "xyz").unwrap();
        store.set("userRoles", r#"["ROLE_ADMIN"]"#).unwrap();
    }
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("jwtToken").as_deref(), Some("xyz"));
    assert_eq!(reopened.get("userRoles").as_deref(), Some(r#"["ROLE_ADMIN"]"#));
}

#[test]
fn file_store_remove_persists() {
    let path = scratch_path("storage.json");
    let store = FileStore::open(&path).unwrap();
    store.set("jwtToken", "xyz").unwrap();
    store.remove("jwtToken").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert!(reopened.get("jwtToken").is_none());
}

#[test]
fn file_store_corrupt_file_is_error() {
    let path = scratch_path("corrupt.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(FileStore::open(&path), Err(StorageError::Json(_))));
}

#[test]
fn file_store_blank_file_opens_empty() {
    let path = scratch_path("blank.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "\n").unwrap();
    assert!(FileStore::open(&path).unwrap().get("jwtToken").is_none());
}
