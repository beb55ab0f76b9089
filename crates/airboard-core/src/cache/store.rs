use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::debug;

/// String key-value store backed by one JSON file per key.
///
/// Values are opaque strings; callers serialize before `set`.
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", key))?;
        Ok(Some(contents))
    }

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// The value goes to a sibling temp file first and is renamed into place,
    /// so a reader never sees a half-written entry.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value).with_context(|| format!("Failed to write cache entry: {}", key))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to commit cache entry: {}", key))?;
        debug!(key = key, bytes = value.len(), "Cache entry written");
        Ok(())
    }

    /// Remove `key`. Returns whether an entry existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove cache entry: {}", key))?;
        Ok(true)
    }

    /// Last write time of `key`, if present.
    pub fn modified(&self, key: &str) -> Result<Option<SystemTime>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let meta = fs::metadata(&path)
            .with_context(|| format!("Failed to stat cache entry: {}", key))?;
        let modified = meta
            .modified()
            .with_context(|| format!("Failed to read modification time of cache entry: {}", key))?;
        Ok(Some(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::new(dir.path().to_path_buf()).expect("store");
        assert!(store.get("missing").expect("get").is_none());
        assert!(store.modified("missing").expect("modified").is_none());
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::new(dir.path().join("nested")).expect("store");

        store.set("airlineData", "[null]").expect("set");
        assert_eq!(store.get("airlineData").expect("get").as_deref(), Some("[null]"));
        assert!(store.modified("airlineData").expect("modified").is_some());

        store.set("airlineData", "[]").expect("overwrite");
        assert_eq!(store.get("airlineData").expect("get").as_deref(), Some("[]"));

        assert!(store.remove("airlineData").expect("remove"));
        assert!(!store.remove("airlineData").expect("remove again"));
        assert!(store.get("airlineData").expect("get").is_none());
    }

    #[test]
    fn test_modified_after_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::new(dir.path().to_path_buf()).expect("store");
        let before = SystemTime::now() - std::time::Duration::from_secs(60);

        store.set("airlineData", "[]").expect("set");
        let modified = store
            .modified("airlineData")
            .expect("modified")
            .expect("entry present");
        assert!(modified >= before);
    }
}
