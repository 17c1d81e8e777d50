// SPDX-License-Identifier: MPL-2.0
//! String key-value stores.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A persistent string key-value store.
///
/// Access is synchronous and best-effort: callers decide whether a failure
/// matters. The theme store logs and ignores them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// Store persisted as a flat TOML table.
///
/// Every read goes to disk, so values written by another instance are seen
/// immediately. Writes rewrite the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Uses `path` as the backing file. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(table)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_table()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value.to_string());
        self.write_table(&table)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut table = self.read_table()?;
        if table.remove(key).is_some() {
            self.write_table(&table)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.values.borrow_mut().clear();
        Ok(())
    }
}

/// Store that keeps nothing.
///
/// Stands in when no configuration directory can be resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

impl KeyValueStore for NoOpStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested").join("storage.toml");

        let mut store = FileStore::new(&path);
        store.set("theme", "light").expect("set should succeed");

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("theme").expect("get should succeed"),
            Some("light".to_string())
        );
    }

    #[test]
    fn file_store_missing_file_reads_as_empty() {
        let dir = tempdir().expect("failed to create temp dir");
        let store = FileStore::new(dir.path().join("storage.toml"));

        assert_eq!(store.get("theme").expect("get should succeed"), None);
        assert!(!store.contains("theme").expect("contains should succeed"));
    }

    #[test]
    fn file_store_corrupt_file_is_config_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("storage.toml");
        fs::write(&path, "not = valid = toml").expect("failed to write file");

        let store = FileStore::new(&path);
        assert!(matches!(store.get("theme"), Err(Error::Config(_))));
    }

    #[test]
    fn file_store_remove_and_clear() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut store = FileStore::new(dir.path().join("storage.toml"));
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some("2".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_values() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn noop_store_never_returns_values() {
        let mut store = NoOpStore;
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
    }
}
