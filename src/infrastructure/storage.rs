use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::errors::StorageError;
use crate::domain::ports::Storage;

/// Process-local storage. Clones share the same map, the way every script
/// on a page shares one `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// `fail` picks the error kind reported for a poisoned lock.
    fn lock(
        &self,
        fail: fn(String) -> StorageError,
    ) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|e| fail(e.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock(StorageError::Read)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock(StorageError::Write)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.lock(StorageError::Write)?.remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk, mapping keys to string
/// values. Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::Read(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| StorageError::Write(format!("{}: {}", self.path.display(), e)))
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        let mut entries = match self.load() {
            Err(StorageError::Corrupted(e)) => {
                log::warn!(
                    "Overwriting corrupted storage file {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
            other => other?,
        };
        apply(&mut entries);
        self.store(&entries)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cart_store::CartStore;
    use crate::domain::cart::{Product, ProductId};

    #[test]
    fn memory_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        b.delete("k").unwrap();
        assert_eq!(a.get("k").unwrap(), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        FileStorage::new(&path).set("shoppingCart", "[]").unwrap();
        FileStorage::new(&path).set("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("shoppingCart").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get("shoppingCart").unwrap(), None);
        storage.delete("shoppingCart").unwrap();
    }

    #[test]
    fn file_storage_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(storage.get("k"), Err(StorageError::Corrupted(_))));
    }

    #[test]
    fn corrupted_file_is_replaced_on_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "garbage{").unwrap();

        let store = CartStore::new(FileStorage::new(&path));
        assert!(store.get_items().is_empty());
        let product = Product {
            id: ProductId::Int(1),
            name: "Dulux Inspire".to_string(),
            brand: "Dulux".to_string(),
            category_name: "Interior".to_string(),
            price: "10.000".to_string(),
            image: String::new(),
        };
        assert_eq!(store.add_item(&product), 1);
        assert_eq!(store.add_item(&product), 2);
        assert_eq!(store.get_items().len(), 2);

        store.clear();
        assert!(store.get_items().is_empty());
        assert!(FileStorage::new(&path).get("shoppingCart").unwrap().is_none());
    }

    #[test]
    fn poisoned_memory_lock_reports_operation_kind() {
        let storage = MemoryStorage::new();
        let shared = storage.clone();
        let _ = std::thread::spawn(move || {
            let _held = shared.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(storage.get("k"), Err(StorageError::Read(_))));
        assert!(matches!(storage.set("k", "v"), Err(StorageError::Write(_))));
        assert!(matches!(storage.delete("k"), Err(StorageError::Write(_))));
    }
}
